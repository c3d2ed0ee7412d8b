use url::Url;

use crate::dto::hh_dto::VacancySearchQuery;
use crate::error::{Error, Result};

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Build `<base_url>/vacancies?text=...` for one search page.
///
/// `text` is always sent. `per_page` of 0, a `page` of `None` or 0, and blank
/// `area`/`date_to`/`date_from` are left out. Dates and area codes go through
/// as given.
pub fn build_search_url(base_url: &str, query: &VacancySearchQuery, page: Option<u32>) -> Result<Url> {
    let endpoint = format!("{}/vacancies", base_url.trim_end_matches('/'));
    let mut url = Url::parse(&endpoint)
        .map_err(|e| Error::Config(format!("Invalid API base URL {}: {}", base_url, e)))?;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("text", &query.text);

        if query.per_page > 0 {
            pairs.append_pair("per_page", &query.per_page.to_string());
        }
        if let Some(page) = page.filter(|p| *p > 0) {
            pairs.append_pair("page", &page.to_string());
        }
        if let Some(area) = non_empty(&query.area) {
            pairs.append_pair("area", area);
        }
        if let Some(date_to) = non_empty(&query.date_to) {
            pairs.append_pair("date_to", date_to);
        }
        if let Some(date_from) = non_empty(&query.date_from) {
            pairs.append_pair("date_from", date_from);
        }
    }

    Ok(url)
}
