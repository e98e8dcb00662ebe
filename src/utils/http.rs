// src/utils/http.rs

//! HTTP client utilities: client construction and bounded retrying.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{FetchConfig, RunLog, Stage};

/// HTTP statuses worth retrying on an idempotent GET.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Create a configured asynchronous HTTP client.
///
/// Connect and read timeouts are distinct so a stalled handshake fails
/// faster than a slow body.
pub fn create_client(config: &FetchConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Whether an error may be resolved by retrying the request.
///
/// Only connection-level timeouts and the fixed retryable status set
/// qualify; parse and empty-body failures never do.
pub fn is_retryable(error: &AppError) -> bool {
    match error {
        AppError::Timeout(_) => true,
        AppError::HttpStatus { status, .. } => RETRYABLE_STATUSES.contains(status),
        _ => false,
    }
}

/// Retry bookkeeping for one request: bounded attempts, exponential backoff.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    max_retries: u32,
    backoff: Duration,
    attempt: u32,
}

impl RetrySchedule {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
            attempt: 0,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_backoff_ms),
        )
    }

    /// Decide whether to retry after `error`.
    ///
    /// Returns the backoff to sleep before the next attempt, doubling each
    /// time, or `None` once the error is non-retryable or the budget is
    /// exhausted.
    pub fn next_delay(&mut self, error: &AppError) -> Option<Duration> {
        if !is_retryable(error) || self.attempt >= self.max_retries {
            return None;
        }
        let delay = self.backoff.saturating_mul(1u32 << self.attempt.min(16));
        self.attempt += 1;
        Some(delay)
    }

    /// Attempts consumed so far, excluding the initial one.
    pub fn retries_used(&self) -> u32 {
        self.attempt
    }
}

/// Issue a GET and return the body, with the configured retry policy.
///
/// Every attempt and outcome is traced into `log`. A 2xx response with an
/// empty (whitespace-only) body is reported as [`AppError::EmptyResponse`]
/// and never retried.
pub async fn get_with_retry(
    client: &reqwest::Client,
    url: &str,
    accept_json: bool,
    config: &FetchConfig,
    log: &mut RunLog,
) -> Result<String> {
    let mut schedule = RetrySchedule::from_config(config);

    loop {
        match get_once(client, url, accept_json, log).await {
            Ok(body) => return Ok(body),
            Err(error) => match schedule.next_delay(&error) {
                Some(delay) => {
                    log.push(
                        Stage::Fetch,
                        format!(
                            "🔁 Tentativa {} falhou ({}), aguardando {}ms",
                            schedule.retries_used(),
                            error,
                            delay.as_millis()
                        ),
                    );
                    tokio::time::sleep(delay).await;
                }
                None => return Err(error),
            },
        }
    }
}

async fn get_once(
    client: &reqwest::Client,
    url: &str,
    accept_json: bool,
    log: &mut RunLog,
) -> Result<String> {
    let mut request = client.get(url);
    if accept_json {
        request = request.header(reqwest::header::ACCEPT, "application/json");
    }

    log.push(Stage::Fetch, format!("🔗 Acessando: {url}"));
    let response = request.send().await?;
    let status = response.status();
    log.push(Stage::Fetch, format!("📥 Status recebido: {}", status.as_u16()));

    if !status.is_success() {
        return Err(AppError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Err(AppError::EmptyResponse(url.to_string()));
    }
    Ok(body)
}
