pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::services::{hh_service::HhService, vacancy_service::VacancyService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub hh_service: HhService,
    pub vacancy_service: VacancyService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let hh_service = HhService::new(&config)?;
        let vacancy_service = VacancyService::new(hh_service.clone());

        Ok(Self {
            config,
            hh_service,
            vacancy_service,
        })
    }
}
