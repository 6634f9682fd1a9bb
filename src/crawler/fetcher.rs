//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured User-Agent
//! - GET requests with per-call timeouts
//! - Retry with exponential backoff and jitter for transient failures
//! - Randomized pacing delays between requests

use crate::config::{RetryConfig, SiteConfig};
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A completed HTTP exchange
///
/// Any response without a retryable condition is a fetch-level success;
/// callers must still inspect the status before extraction.
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// Response body
    pub body: String,
}

impl FetchedPage {
    /// Whether the response carried a 200 status
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Builds the HTTP client used for every request in a run
///
/// # Arguments
///
/// * `site` - The target site configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(site: &SiteConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(site.user_agent.clone())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with retry on transient failures
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 5xx | Backoff, retry up to `max_retries` attempts |
/// | Transport error (timeout, refused, body read) | Backoff, retry |
/// | Any other status (including 4xx) | Returned immediately |
///
/// Backoff for attempt i is `base_delay_ms * 2^i` plus up to one second of
/// uniform jitter, with no upper clamp. Each retry and the terminal failure
/// are logged with the caller-supplied context message.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Per-request timeout
/// * `retry` - The retry policy
/// * `cancel` - Cancellation token; firing abandons the fetch
/// * `context` - Log message prefix identifying the caller's item
///
/// # Returns
///
/// * `Some(FetchedPage)` - A response was obtained (status not yet checked)
/// * `None` - Terminal failure after exhausting retries, or cancelled
pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    timeout: Duration,
    retry: &RetryConfig,
    cancel: &CancellationToken,
    context: &str,
) -> Option<FetchedPage> {
    for attempt in 0..retry.max_retries {
        if cancel.is_cancelled() {
            return None;
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => return None,
            result = client.get(url).timeout(timeout).send() => result,
        };

        match outcome {
            Ok(response) => {
                let status = response.status().as_u16();

                // 5xx is retryable; anything else goes back to the caller
                if status >= 500 {
                    let reason = format!("status code {}", status);
                    if !wait_before_retry(retry, attempt, cancel, context, &reason).await {
                        return None;
                    }
                    continue;
                }

                let body = tokio::select! {
                    _ = cancel.cancelled() => return None,
                    body = response.text() => body,
                };

                match body {
                    Ok(body) => return Some(FetchedPage { status, body }),
                    Err(e) => {
                        let reason = format!("body read failed: {}", e);
                        if !wait_before_retry(retry, attempt, cancel, context, &reason).await {
                            return None;
                        }
                    }
                }
            }
            Err(e) => {
                let reason = e.to_string();
                if !wait_before_retry(retry, attempt, cancel, context, &reason).await {
                    return None;
                }
            }
        }
    }

    tracing::warn!(
        "{}: all {} retry attempts failed for {}",
        context,
        retry.max_retries,
        url
    );
    None
}

/// Computes the backoff delay for a 0-indexed attempt
fn backoff_delay(retry: &RetryConfig, attempt: u32) -> Duration {
    let base = retry.base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    let jitter = rand::thread_rng().gen_range(0..1000);
    Duration::from_millis(base.saturating_add(jitter))
}

/// Logs the retry and sleeps out the backoff
///
/// Returns false if cancellation fired during the wait.
async fn wait_before_retry(
    retry: &RetryConfig,
    attempt: u32,
    cancel: &CancellationToken,
    context: &str,
    reason: &str,
) -> bool {
    let delay = backoff_delay(retry, attempt);
    tracing::warn!(
        "{}: {}, retrying in {:.2}s (attempt {}/{})",
        context,
        reason,
        delay.as_secs_f64(),
        attempt + 1,
        retry.max_retries
    );

    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

/// Sleeps a uniformly random duration within `[min_ms, max_ms]`
///
/// Inserted before most fetches to spread request timing.
pub async fn paced_delay(min_ms: u64, max_ms: u64) {
    let wait = rand::thread_rng().gen_range(min_ms..=max_ms);
    tokio::time::sleep(Duration::from_millis(wait)).await;
}
