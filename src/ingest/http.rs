// src/ingest/http.rs
//! Shared HTTP layer: one `reqwest::Client` with user agent, per-request
//! timeout and a bounded retry policy with exponential backoff.

use anyhow::{Context, Result};
use metrics::counter;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_USER_AGENT: &str = "GameTrendsBot/1.0";

/// Retry on transport errors and on these statuses only.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u8,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(status: StatusCode) -> bool {
        RETRYABLE_STATUSES.contains(&status.as_u16())
    }

    /// Sleep before retry number `attempt` (1-based): base, 2×base, 4×base, ...
    pub fn backoff(&self, attempt: u8) -> Duration {
        let shift = u32::from(attempt.saturating_sub(1)).min(16);
        self.base_backoff.saturating_mul(1u32 << shift)
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, retry })
    }

    /// Send a request built by `build`, retrying per policy. The final
    /// response is returned as is, whatever its status; only exhausted
    /// transport failures become errors.
    pub async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt: u8 = 0;
        loop {
            match build(&self.client).send().await {
                Ok(rsp) if Self::should_retry_status(rsp.status(), attempt, self.retry) => {
                    tracing::debug!(status = %rsp.status(), attempt, url = %rsp.url(), "retrying");
                }
                Ok(rsp) => return Ok(rsp),
                Err(e) if attempt < self.retry.max_retries => {
                    tracing::debug!(error = %e, attempt, "request failed, retrying");
                }
                Err(e) => {
                    return Err(e).context(format!(
                        "request failed after {} attempt(s)",
                        u32::from(attempt) + 1
                    ))
                }
            }
            attempt += 1;
            counter!("http_retries_total").increment(1);
            tokio::time::sleep(self.retry.backoff(attempt)).await;
        }
    }

    /// `send` + `error_for_status` + JSON body.
    pub async fn get_json<F>(&self, build: F) -> Result<serde_json::Value>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let rsp = self.send(build).await?;
        let url = rsp.url().to_string();
        rsp.error_for_status()
            .with_context(|| format!("HTTP error from {url}"))?
            .json::<serde_json::Value>()
            .await
            .with_context(|| format!("decoding JSON from {url}"))
    }

    fn should_retry_status(status: StatusCode, attempt: u8, policy: RetryPolicy) -> bool {
        attempt < policy.max_retries && RetryPolicy::is_retryable(status)
    }
}
