//! Bounded retry with exponential backoff.
//!
//! An operation is retried only while its error reports itself as transient,
//! the attempt count stays below [`RetryConfig::max_tries`] and the next wait
//! still fits inside [`RetryConfig::max_time`].

use std::future::Future;
use std::io::ErrorKind;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{error, info, warn};

use crate::config::RetryConfig;
use crate::error::Error;

/// Classifies an error as transient (worth another attempt) or permanent.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Connection refused/reset, server disconnect, or a failure while
            // streaming the body. Timeouts and status errors are not retried.
            Error::Reqwest(e) => !e.is_timeout() && (e.is_connect() || e.is_request() || e.is_body()),
            Error::Io(e) => matches!(
                e.kind(),
                ErrorKind::ConnectionRefused
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::NotConnected
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            ),
            Error::Config(_)
            | Error::Validation(_)
            | Error::Url(_)
            | Error::UnexpectedStatus { .. }
            | Error::Json(_)
            | Error::MissingPagination { .. }
            | Error::InvalidVacancy { .. }
            | Error::EmptyResult
            | Error::Csv(_)
            | Error::Internal(_) => false,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, or the retry budget
/// in `config` is spent. The last error is returned unchanged.
pub async fn with_backoff<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let started = Instant::now();
    let mut attempt: u32 = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempts = attempt, "Request succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < config.max_tries => {
                let wait = if config.jitter {
                    full_jitter(delay)
                } else {
                    delay
                };

                if started.elapsed() + wait > config.max_time {
                    error!(
                        error = %e,
                        attempts = attempt,
                        max_time_ms = config.max_time.as_millis(),
                        "Retry time budget exhausted"
                    );
                    return Err(e);
                }

                warn!(
                    error = %e,
                    attempt,
                    max_tries = config.max_tries,
                    delay_ms = wait.as_millis(),
                    "Transient failure, retrying"
                );
                tokio::time::sleep(wait).await;
                delay = next_delay(delay, config);
            }
            Err(e) => {
                if e.is_retryable() {
                    error!(error = %e, attempts = attempt, "Giving up after all retry attempts");
                } else {
                    error!(error = %e, "Request failed with non-retryable error");
                }
                return Err(e);
            }
        }
    }
}

/// Grow `delay` by the backoff multiplier, capped at `max_delay`.
fn next_delay(delay: Duration, config: &RetryConfig) -> Duration {
    Duration::try_from_secs_f64(delay.as_secs_f64() * config.multiplier)
        .unwrap_or(config.max_delay)
        .min(config.max_delay)
}

/// Uniform wait in `[0, delay]`.
fn full_jitter(delay: Duration) -> Duration {
    let factor: f64 = rand::thread_rng().gen_range(0.0..=1.0);
    delay.mul_f64(factor)
}
