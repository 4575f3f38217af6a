//! Bearer GET transport for the Web API
//!
//! Every Web API call this crate makes is an idempotent GET, so any attempt
//! may be replayed. Transport failures and 5xx answers back off
//! exponentially. A 429 waits for the `Retry-After` seconds Spotify sends and
//! gives up when that wait is longer than [`RetryPolicy::max_retry_after`].

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use songlink_domain::{Result, SongLinkError};
use tracing::{debug, warn};

use crate::errors::InfraError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How often and how long to retry a GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Delay before the first retry; doubled on each later one
    pub backoff: Duration,
    /// Longest `Retry-After` honored before returning the 429 as is
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(200),
            max_retry_after: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries
    pub fn none() -> Self {
        Self { attempts: 1, ..Self::default() }
    }

    fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ApiTransport {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ApiTransport {
    pub(crate) fn new(retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("songlink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SongLinkError::from(InfraError::from(e)))?;
        Ok(Self { client, retry })
    }

    /// GET `url` with `access_token` as bearer, retrying per the policy
    ///
    /// Non-retryable statuses come back as `Ok` for the caller to map.
    pub(crate) async fn get(&self, url: &str, access_token: &str) -> Result<Response> {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;

        loop {
            let last = attempt >= attempts;
            let wait = match self.client.get(url).bearer_auth(access_token).send().await {
                Ok(response) => match self.wait_before_retry(&response, attempt) {
                    Some(wait) if !last => {
                        debug!(status = %response.status(), attempt, ?wait, "Retrying Web API call");
                        wait
                    }
                    _ => return Ok(response),
                },
                Err(err) if !last && is_transient(&err) => {
                    debug!(error = %err, attempt, "Web API transport failure, retrying");
                    self.retry.backoff_for(attempt)
                }
                Err(err) => return Err(InfraError::from(err).into()),
            };

            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }

    fn wait_before_retry(&self, response: &Response, attempt: u32) -> Option<Duration> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return match retry_after(response) {
                Some(wait) if wait > self.retry.max_retry_after => {
                    warn!(?wait, "Rate limited for longer than the retry cap");
                    None
                }
                Some(wait) => Some(wait),
                None => Some(self.retry.backoff_for(attempt)),
            };
        }
        status.is_server_error().then(|| self.retry.backoff_for(attempt))
    }
}

/// `Retry-After` in delta-seconds, the form Spotify sends
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}
