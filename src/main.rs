use std::path::PathBuf;

use clap::Parser;
use hh_vacancy_parser::{config::Config, dto::hh_dto::VacancySearchQuery, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parse hh.ru vacancies and write the result to CSV.
#[derive(Debug, Parser)]
#[command(name = "hh-vacancy-parser", version)]
struct Cli {
    /// Vacancy search text, e.g. "machine learning engineer".
    #[arg(short = 'q', long)]
    query: String,

    /// Only vacancies published on or after this date (YYYY-MM-DD).
    #[arg(long = "date-from", alias = "date_from", value_name = "YYYY-MM-DD")]
    date_from: Option<String>,

    /// Only vacancies published on or before this date (YYYY-MM-DD).
    #[arg(long = "date-to", alias = "date_to", value_name = "YYYY-MM-DD")]
    date_to: Option<String>,

    /// hh.ru area id. Defaults to Moscow; pass an empty value to search everywhere.
    #[arg(long, default_value = "1")]
    area: String,

    /// Page size, up to 100. Overrides HH_PER_PAGE.
    #[arg(long = "per-page")]
    per_page: Option<u32>,

    /// Output CSV file. Defaults to hh_vacancy.csv in the system temp directory.
    #[arg(long)]
    filepath: Option<PathBuf>,
}

fn default_output_path() -> PathBuf {
    std::env::temp_dir().join("hh_vacancy.csv")
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config);

    let filepath = cli.filepath.unwrap_or_else(default_output_path);
    let query = VacancySearchQuery {
        text: cli.query,
        date_from: cli.date_from,
        date_to: cli.date_to,
        area: Some(cli.area),
        per_page: cli.per_page.unwrap_or(config.per_page),
    };

    let state = AppState::new(config)?;
    info!(text = %query.text, "Starting vacancy export");
    let summary = state.vacancy_service.export(&query, &filepath).await?;

    println!("File recorded to {}", summary.path.display());
    Ok(())
}
