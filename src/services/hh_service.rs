use std::collections::HashSet;

use futures::future::join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};
use url::Url;
use validator::Validate;

use crate::config::{Config, RetryConfig};
use crate::dto::hh_dto::{PaginationInfo, VacancyPage, VacancySearchQuery};
use crate::error::{Error, Result};
use crate::models::vacancy::VacancyRecord;
use crate::services::query_builder::build_search_url;
use crate::utils::retry::with_backoff;

const ERROR_BODY_LIMIT: usize = 512;

/// Client for the hh.ru vacancy search API.
#[derive(Clone)]
pub struct HhService {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl HhService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.api_base_url.clone(),
            retry: config.retry.clone(),
        }
    }

    pub fn search_url(&self, query: &VacancySearchQuery, page: Option<u32>) -> Result<Url> {
        build_search_url(&self.base_url, query, page)
    }

    /// Number of result pages the API reports for a search URL.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn fetch_page_count(&self, url: &Url) -> Result<u32> {
        let info: PaginationInfo = with_backoff(&self.retry, || self.get_json(url)).await?;
        info.pages.ok_or_else(|| {
            error!("Response has no pagination");
            Error::MissingPagination {
                url: url.to_string(),
            }
        })
    }

    /// Fetch one page and validate its items.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn fetch_page(&self, url: &Url) -> Result<HashSet<VacancyRecord>> {
        let page: VacancyPage = with_backoff(&self.retry, || self.get_json(url)).await?;
        let item_count = page.items.len();
        let records = page
            .items
            .into_iter()
            .map(VacancyRecord::try_from)
            .collect::<Result<HashSet<_>>>()?;
        debug!(items = item_count, unique = records.len(), "Parsed vacancy page");
        Ok(records)
    }

    /// Discover the page count, then fetch every page concurrently and merge
    /// the results. Waits for all pages; the first failed page, in page
    /// order, fails the whole call.
    pub async fn fetch_vacancies(&self, query: &VacancySearchQuery) -> Result<HashSet<VacancyRecord>> {
        query.validate()?;

        let base_url = self.search_url(query, None)?;
        let pages = self.fetch_page_count(&base_url).await?;
        info!(pages, text = %query.text, "Discovered vacancy pages");

        let urls = (0..pages)
            .map(|page| self.search_url(query, Some(page)))
            .collect::<Result<Vec<_>>>()?;

        let results = join_all(urls.iter().map(|url| self.fetch_page(url))).await;

        let mut vacancies = HashSet::new();
        let mut fetched = 0usize;
        for (page, result) in results.into_iter().enumerate() {
            let records = result.map_err(|e| {
                error!(page, error = %e, "Vacancy page failed");
                e
            })?;
            fetched += records.len();
            vacancies.extend(records);
        }

        info!(
            pages,
            fetched,
            unique = vacancies.len(),
            duplicates = fetched - vacancies.len(),
            "Collected vacancies"
        );
        Ok(vacancies)
    }

    /// One GET attempt. Non-2xx responses and malformed bodies are permanent
    /// failures; transport errors are left for the retry layer to classify.
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let mut excerpt: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            if excerpt.len() < body.len() {
                excerpt.push_str("...");
            }
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body: excerpt,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
