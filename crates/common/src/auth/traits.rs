//! Traits for OAuth exchange operations
//!
//! The token lifecycle depends on the network only through
//! [`TokenExchangeClient`], so tests can script provider behaviour.

use async_trait::async_trait;

use super::client::OAuthClientError;
use super::types::TokenExchangeResult;

/// Trait for the two token-endpoint exchanges
///
/// Any non-success outcome (HTTP error status, malformed body, transport
/// failure) comes back as `Err`; implementations never panic.
#[async_trait]
pub trait TokenExchangeClient: Send + Sync {
    /// Exchange an authorization code for tokens
    ///
    /// # Arguments
    /// * `code` - Authorization code from the redirect callback
    /// * `verifier` - PKCE code verifier matching the challenge sent earlier
    /// * `redirect_uri` - Redirect URI used in the authorization request
    ///
    /// # Errors
    /// Returns error if the exchange fails for any reason
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenExchangeResult, OAuthClientError>;

    /// Exchange a refresh token for a new access token
    ///
    /// # Errors
    /// Returns error if the exchange fails or the token is invalid/revoked
    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenExchangeResult, OAuthClientError>;
}
