//! OAuth 2.0 types and structures
//!
//! Defines the persisted token record, the transient exchange response, and
//! provider configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Spotify authorization endpoint
pub const SPOTIFY_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Spotify token endpoint
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Scope needed to read the currently playing track
pub const SCOPE_CURRENTLY_PLAYING: &str = "user-read-currently-playing";

/// The persisted token unit
///
/// A record is only ever built from a provider exchange response (see
/// [`TokenRecord::from_exchange`]); `expires_at` is absolute seconds since
/// the UNIX epoch computed at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Opaque bearer credential
    pub access_token: String,

    /// Credential used to mint new access tokens
    pub refresh_token: String,

    /// Seconds since epoch after which `access_token` must not be used
    pub expires_at: i64,
}

impl TokenRecord {
    /// Build a record from an exchange response issued at `issued_at`
    ///
    /// Returns `None` when the response carries no refresh token, since a
    /// record without one is not a valid record.
    #[must_use]
    pub fn from_exchange(response: TokenExchangeResult, issued_at: i64) -> Option<Self> {
        let refresh_token = response.refresh_token?;
        Some(Self {
            access_token: response.access_token,
            refresh_token,
            expires_at: issued_at.saturating_add(response.expires_in),
        })
    }

    /// Seconds remaining until expiry, negative once expired
    #[must_use]
    pub fn seconds_until_expiry(&self, now: i64) -> i64 {
        self.expires_at.saturating_sub(now)
    }
}

/// OAuth token response from the authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749). Never persisted
/// directly; always turned into a [`TokenRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenExchangeResult {
    pub access_token: String,

    /// Omitted by some providers on refresh when the old one stays valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Access token lifetime in seconds, relative to issuance
    pub expires_in: i64,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Granted scopes (space-separated)
    #[serde(default)]
    pub scope: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// OAuth configuration for a PKCE public client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    /// OAuth client ID (no secret: public client)
    pub client_id: String,

    /// Browser-facing authorization endpoint
    pub authorization_endpoint: String,

    /// Token endpoint for code and refresh exchanges
    pub token_endpoint: String,

    /// Where the provider sends the user back with `?code=`
    pub redirect_uri: String,

    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Create a new OAuth configuration
    #[must_use]
    pub fn new(
        client_id: String,
        authorization_endpoint: String,
        token_endpoint: String,
        redirect_uri: String,
        scopes: Vec<String>,
    ) -> Self {
        Self { client_id, authorization_endpoint, token_endpoint, redirect_uri, scopes }
    }

    /// Spotify settings with the currently-playing scope
    pub fn spotify(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self::new(
            client_id.into(),
            SPOTIFY_AUTHORIZE_URL.to_string(),
            SPOTIFY_TOKEN_URL.to_string(),
            redirect_uri.into(),
            vec![SCOPE_CURRENTLY_PLAYING.to_string()],
        )
    }

    /// Get scopes as space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

/// OAuth error response from authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
