//! OAuth 2.0 token-endpoint client
//!
//! Performs the authorization-code and refresh-token exchanges as
//! form-encoded POSTs, as a public PKCE client (no client secret).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use thiserror::Error;
use tracing::debug;

use super::traits::TokenExchangeClient;
use super::types::{OAuthConfig, OAuthError, TokenExchangeResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for OAuth client operations
#[derive(Debug, Error)]
pub enum OAuthClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// OAuth server returned an error
    #[error("OAuth error: {0}")]
    OAuthError(OAuthError),

    /// Non-success status without an RFC 6749 error body
    #[error("Token endpoint returned {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Failed to parse response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No refresh token available
    #[error("No refresh token available")]
    NoRefreshToken,

    /// Redirect carried no authorization code
    #[error("Authorization callback did not include a code")]
    MissingCode,

    /// User or provider refused the authorization
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    /// State parameter mismatch (CSRF attack detected)
    #[error("State mismatch (CSRF): expected {expected}, received {received}")]
    StateMismatch { expected: String, received: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// OAuth 2.0 client with PKCE support
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a new OAuth client with the given configuration
    ///
    /// # Examples
    /// ```
    /// use songlink_common::auth::{OAuthClient, OAuthConfig};
    ///
    /// let config = OAuthConfig::spotify("client_id", "obsidian://callback");
    /// let client = OAuthClient::new(config);
    /// assert_eq!(client.redirect_uri(), "obsidian://callback");
    /// ```
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        let client =
            Client::builder().timeout(REQUEST_TIMEOUT).build().unwrap_or_else(|_| Client::new());
        Self { config, client }
    }

    /// Create a client that reuses an existing `reqwest` client
    #[must_use]
    pub fn with_http_client(config: OAuthConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Exchange authorization code for tokens
    ///
    /// # Errors
    /// Returns error if the request fails, the server rejects the code, or
    /// the response does not parse
    pub async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenExchangeResult, OAuthClientError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("code_verifier", verifier),
        ];

        debug!(endpoint = %self.config.token_endpoint, "Exchanging authorization code");
        self.post_token_request(&params).await
    }

    /// Refresh access token using refresh token
    ///
    /// # Errors
    /// Returns `NoRefreshToken` for an empty token without touching the
    /// network; otherwise as [`Self::exchange_code`]
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenExchangeResult, OAuthClientError> {
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
        ];

        debug!(endpoint = %self.config.token_endpoint, "Refreshing access token");
        self.post_token_request(&params).await
    }

    /// Get the configured redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    async fn post_token_request(
        &self,
        params: &[(&str, &str)],
    ) -> Result<TokenExchangeResult, OAuthClientError> {
        let response = self.client.post(&self.config.token_endpoint).form(params).send().await?;
        parse_token_response(response).await
    }
}

async fn parse_token_response(
    response: Response,
) -> Result<TokenExchangeResult, OAuthClientError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(match serde_json::from_str::<OAuthError>(&body) {
            Ok(error) => OAuthClientError::OAuthError(error),
            Err(_) => OAuthClientError::HttpStatus { status: status.as_u16(), body },
        });
    }

    serde_json::from_str(&body).map_err(|e| OAuthClientError::ParseError(e.to_string()))
}

#[async_trait]
impl TokenExchangeClient for OAuthClient {
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenExchangeResult, OAuthClientError> {
        self.exchange_code(code, verifier, redirect_uri).await
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenExchangeResult, OAuthClientError> {
        self.refresh_access_token(refresh_token).await
    }
}
