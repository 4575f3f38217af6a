//! Token manager with transparent refresh
//!
//! Resolves the persisted record into one of:
//! - absent: nothing stored, or the stored string is not a valid record
//!   (the invalid string is removed)
//! - valid: returned as-is
//! - expired: refreshed through the exchange client and persisted; if the
//!   refresh fails the stale record is returned unchanged so a transient
//!   provider outage does not force re-authorization
//!
//! Refreshes are serialized: concurrent callers that all observe an expired
//! record wait on one exchange and then read its result back from storage,
//! so a single-use refresh token is never spent twice.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::client::OAuthClientError;
use super::codec;
use super::expiry::ExpiryPolicy;
use super::pkce::AuthorizationRequest;
use super::store::TokenStore;
use super::traits::TokenExchangeClient;
use super::types::{TokenExchangeResult, TokenRecord};
use crate::storage::{KeyValueStore, StorageError};
use crate::time::{Clock, SystemClock};

/// Error type for token manager operations
#[derive(Debug, Error)]
pub enum TokenManagerError {
    /// Storage backend failed
    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    /// Exchange with the provider failed
    #[error("Token exchange failed: {0}")]
    Exchange(#[from] OAuthClientError),

    /// Provider response lacked a refresh token and none was stored before
    #[error("Token response did not include a refresh token")]
    MissingRefreshToken,
}

/// Token manager with refresh-on-read
///
/// Owns the decision of whether the persisted record is usable; the
/// [`TokenStore`] owns the persisted representation.
pub struct TokenManager<C: TokenExchangeClient + ?Sized, S: KeyValueStore + ?Sized> {
    exchange_client: Arc<C>,
    store: TokenStore<S>,
    clock: Arc<dyn Clock>,
    policy: ExpiryPolicy,
    refresh_lock: Mutex<()>,
}

impl<C: TokenExchangeClient + ?Sized, S: KeyValueStore + ?Sized> TokenManager<C, S> {
    /// Create a token manager on the system clock with the strict expiry
    /// policy
    #[must_use]
    pub fn new(exchange_client: Arc<C>, store: TokenStore<S>) -> Self {
        Self {
            exchange_client,
            store,
            clock: Arc::new(SystemClock),
            policy: ExpiryPolicy::default(),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Use `clock` for every "now" reading
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use `policy` to decide when a record is stale
    #[must_use]
    pub fn with_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying token store
    #[must_use]
    pub fn store(&self) -> &TokenStore<S> {
        &self.store
    }

    /// Get a usable token, refreshing it first if it has expired
    ///
    /// `None` means the user is not connected. Storage and provider failures
    /// never surface here: they resolve to absence or to the stale record.
    pub async fn get_token(&self) -> Option<TokenRecord> {
        let record = self.load_record().await?;
        if !self.policy.needs_refresh(&record, self.clock.unix_seconds()) {
            return Some(record);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed or disconnected while we waited
        let record = self.load_record().await?;
        if !self.policy.needs_refresh(&record, self.clock.unix_seconds()) {
            debug!("Token refreshed by a concurrent caller");
            return Some(record);
        }

        Some(self.refresh(record).await)
    }

    /// Persist a fresh exchange response as the current record
    ///
    /// This is the only path that writes a record.
    ///
    /// # Errors
    /// Returns `MissingRefreshToken` if the response has no refresh token, or
    /// `Storage` if the write fails
    pub async fn store_token(
        &self,
        response: TokenExchangeResult,
    ) -> Result<TokenRecord, TokenManagerError> {
        let record = TokenRecord::from_exchange(response, self.clock.unix_seconds())
            .ok_or(TokenManagerError::MissingRefreshToken)?;
        let record = self.store.save(record).await?;
        info!(expires_at = record.expires_at, "Token stored");
        Ok(record)
    }

    /// Remove the persisted record (disconnect). Makes no network call.
    ///
    /// # Errors
    /// Returns error if the storage backend fails
    pub async fn clear_token(&self) -> Result<(), TokenManagerError> {
        let _guard = self.refresh_lock.lock().await;
        self.store.clear().await?;
        info!("Token cleared (disconnected)");
        Ok(())
    }

    /// Finish a browser authorization: read the code from the redirect,
    /// exchange it, and store the result
    ///
    /// # Errors
    /// Returns `Exchange` if the callback is unusable or the provider rejects
    /// the code; persisted state is untouched in that case
    pub async fn complete_authorization(
        &self,
        request: &AuthorizationRequest,
        callback_url: &str,
    ) -> Result<TokenRecord, TokenManagerError> {
        let code = request.code_from_callback(callback_url)?;
        let response = self
            .exchange_client
            .exchange_code(&code, request.verifier(), request.redirect_uri())
            .await
            .inspect_err(|e| warn!(error = %e, "Authorization code exchange failed"))?;
        self.store_token(response).await
    }

    /// Seconds until the stored token expires, without refreshing
    pub async fn seconds_until_expiry(&self) -> Option<i64> {
        let record = self.load_record().await?;
        Some(record.seconds_until_expiry(self.clock.unix_seconds()))
    }

    async fn load_record(&self) -> Option<TokenRecord> {
        let raw = match self.store.read().await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Could not read token record; treating as absent");
                return None;
            }
        };

        match codec::decode(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Discarding invalid token record");
                if let Err(clear_err) = self.store.clear().await {
                    warn!(error = %clear_err, "Failed to remove invalid token record");
                }
                None
            }
        }
    }

    async fn refresh(&self, stale: TokenRecord) -> TokenRecord {
        let response = match self.exchange_client.exchange_refresh_token(&stale.refresh_token).await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, expires_at = stale.expires_at, "Token refresh failed; returning stale token");
                return stale;
            }
        };

        let response = TokenExchangeResult {
            refresh_token: response.refresh_token.or_else(|| Some(stale.refresh_token.clone())),
            ..response
        };

        match self.store_token(response.clone()).await {
            Ok(record) => {
                info!(expires_at = record.expires_at, "Successfully refreshed access token");
                record
            }
            Err(e) => {
                // The provider may already have retired the old refresh token
                error!(error = %e, "Refreshed token could not be persisted");
                TokenRecord::from_exchange(response, self.clock.unix_seconds()).unwrap_or(stale)
            }
        }
    }
}
