pub mod export_service;
pub mod hh_service;
pub mod query_builder;
pub mod vacancy_service;
