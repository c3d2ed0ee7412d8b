use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::dto::hh_dto::VacancySearchQuery;
use crate::error::{Error, Result};
use crate::services::export_service::ExportService;
use crate::services::hh_service::HhService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    pub path: PathBuf,
}

/// Search, deduplicate and export in one pass.
#[derive(Clone)]
pub struct VacancyService {
    hh_service: HhService,
}

impl VacancyService {
    pub fn new(hh_service: HhService) -> Self {
        Self { hh_service }
    }

    #[instrument(skip(self, query, path), fields(text = %query.text, path = %path.display()))]
    pub async fn export(&self, query: &VacancySearchQuery, path: &Path) -> Result<RunSummary> {
        let vacancies = self.hh_service.fetch_vacancies(query).await?;
        if vacancies.is_empty() {
            return Err(Error::EmptyResult);
        }

        let target = path.to_path_buf();
        let records = tokio::task::spawn_blocking(move || ExportService::write_csv(&vacancies, &target))
            .await
            .map_err(|e| Error::Internal(format!("CSV export task failed: {}", e)))??;

        info!(records, "Vacancies exported");
        Ok(RunSummary {
            records,
            path: path.to_path_buf(),
        })
    }
}
