//! Mock implementations of the token lifecycle traits
//!
//! Provides mock objects for testing purposes.

// Allow missing panic docs for test mocks - they are designed to be simple
#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{OAuthClientError, TokenExchangeClient, TokenExchangeResult};
use crate::storage::{KeyValueStore, StorageError, StorageResult};

type ScriptedResponses = Arc<Mutex<VecDeque<Result<TokenExchangeResult, OAuthClientError>>>>;
type CodeExchangeLog = Arc<Mutex<Vec<(String, String, String)>>>;

/// Exchange client that replays scripted responses without network calls
///
/// Each call pops the next response queued for its grant; an empty queue
/// answers with an error. Calls are recorded for later assertions.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-utils")]
/// # {
/// use songlink_common::testing::MockExchangeClient;
///
/// let client = MockExchangeClient::new();
/// assert_eq!(client.refresh_calls(), 0);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockExchangeClient {
    code_responses: ScriptedResponses,
    refresh_responses: ScriptedResponses,
    code_exchanges: CodeExchangeLog,
    refresh_tokens: Arc<Mutex<Vec<String>>>,
    refresh_count: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockExchangeClient {
    /// Create a mock with no scripted responses
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` inside every exchange, to widen race windows
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue the outcome of the next authorization-code exchange
    pub fn push_code(&self, response: Result<TokenExchangeResult, OAuthClientError>) {
        self.code_responses.lock().expect("mutex poisoned").push_back(response);
    }

    /// Queue the outcome of the next refresh exchange
    pub fn push_refresh(&self, response: Result<TokenExchangeResult, OAuthClientError>) {
        self.refresh_responses.lock().expect("mutex poisoned").push_back(response);
    }

    /// Number of refresh exchanges attempted
    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_count.load(Ordering::SeqCst)
    }

    /// Refresh tokens presented, in call order
    #[must_use]
    pub fn refresh_tokens_seen(&self) -> Vec<String> {
        self.refresh_tokens.lock().expect("mutex poisoned").clone()
    }

    /// `(code, verifier, redirect_uri)` for each code exchange, in call order
    #[must_use]
    pub fn code_exchanges_seen(&self) -> Vec<(String, String, String)> {
        self.code_exchanges.lock().expect("mutex poisoned").clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn next(queue: &ScriptedResponses) -> Result<TokenExchangeResult, OAuthClientError> {
        queue
            .lock()
            .expect("mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(OAuthClientError::ParseError("no scripted response".into())))
    }
}

#[async_trait]
impl TokenExchangeClient for MockExchangeClient {
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenExchangeResult, OAuthClientError> {
        self.code_exchanges.lock().expect("mutex poisoned").push((
            code.to_string(),
            verifier.to_string(),
            redirect_uri.to_string(),
        ));
        self.pause().await;
        Self::next(&self.code_responses)
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenExchangeResult, OAuthClientError> {
        self.refresh_count.fetch_add(1, Ordering::SeqCst);
        self.refresh_tokens.lock().expect("mutex poisoned").push(refresh_token.to_string());
        self.pause().await;
        Self::next(&self.refresh_responses)
    }
}

/// Key-value backend whose every operation fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Backend("storage unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Backend("storage unavailable".to_string()))
    }

    async fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Backend("storage unavailable".to_string()))
    }
}
