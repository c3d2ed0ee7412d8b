use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.hh.ru";
pub const DEFAULT_USER_AGENT: &str = "api-test-agent";
pub const DEFAULT_PER_PAGE: u32 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub user_agent: String,
    pub per_page: u32,
    pub request_timeout: Duration,
    pub retry: RetryConfig,
    pub log_json: bool,
}

/// Backoff policy shared by page-count discovery and page fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_tries: u32,
    /// Elapsed-time budget across all attempts of one request.
    pub max_time: Duration,
    pub initial_delay: Duration,
    /// Upper bound for a single backoff wait.
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_tries: 2,
            max_time: Duration::from_secs(10),
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            per_page: DEFAULT_PER_PAGE,
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Config::default();
        let retry = RetryConfig {
            max_tries: get_env_parse_or("HH_RETRY_MAX_TRIES", defaults.retry.max_tries)?,
            max_time: Duration::from_secs(get_env_parse_or(
                "HH_RETRY_MAX_TIME_SECS",
                defaults.retry.max_time.as_secs(),
            )?),
            initial_delay: Duration::from_millis(get_env_parse_or(
                "HH_RETRY_INITIAL_DELAY_MS",
                1000,
            )?),
            ..defaults.retry
        };

        if retry.max_tries == 0 {
            return Err(Error::Config(
                "HH_RETRY_MAX_TRIES must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_base_url: get_env_or("HH_API_BASE_URL", &defaults.api_base_url),
            user_agent: get_env_or("HH_USER_AGENT", &defaults.user_agent),
            per_page: get_env_parse_or("HH_PER_PAGE", defaults.per_page)?,
            request_timeout: Duration::from_secs(get_env_parse_or(
                "HH_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            retry,
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}
