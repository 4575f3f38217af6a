//! PKCE (Proof Key for Code Exchange) implementation for OAuth 2.0
//!
//! Implements RFC 7636 for authorization without a client secret, plus the
//! authorization request that carries the challenge to the browser and reads
//! the code back from the redirect.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};
use url::Url;

use super::client::OAuthClientError;
use super::types::OAuthConfig;

/// Random bytes behind a verifier; 48 bytes encode to 64 characters
const VERIFIER_BYTES: usize = 48;
const STATE_BYTES: usize = 32;

fn random_urlsafe(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a cryptographically secure code verifier
///
/// Returns 64 URL-safe characters (RFC 7636 allows 43-128).
#[must_use]
pub fn generate_code_verifier() -> String {
    random_urlsafe(VERIFIER_BYTES)
}

/// Code challenge for `verifier`: BASE64URL(SHA256(ASCII(verifier)))
#[must_use]
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generate a random state token for CSRF protection
#[must_use]
pub fn generate_state() -> String {
    random_urlsafe(STATE_BYTES)
}

/// Compare state tokens without short-circuiting on the first difference
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    expected.len() == actual.len()
        && expected.bytes().zip(actual.bytes()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

/// PKCE challenge pair for OAuth 2.0 authorization
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// Kept secret until token exchange
    pub code_verifier: String,

    /// Sent in the authorization request
    pub code_challenge: String,

    /// Must match between authorization request and callback
    pub state: String,
}

impl PkceChallenge {
    /// Generate a new challenge with fresh random values
    ///
    /// # Examples
    /// ```
    /// use songlink_common::auth::pkce::PkceChallenge;
    ///
    /// let challenge = PkceChallenge::generate();
    /// assert_eq!(challenge.code_verifier.len(), 64);
    /// assert_eq!(challenge.challenge_method(), "S256");
    /// ```
    #[must_use]
    pub fn generate() -> Self {
        let code_verifier = generate_code_verifier();
        let code_challenge = generate_code_challenge(&code_verifier);
        Self { code_verifier, code_challenge, state: generate_state() }
    }

    /// Get the challenge method (always "S256" for SHA256)
    #[must_use]
    pub fn challenge_method(&self) -> &str {
        "S256"
    }
}

/// A pending browser authorization
///
/// Holds the verifier between sending the user to the provider and
/// exchanging the code that comes back.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    challenge: PkceChallenge,
    redirect_uri: String,
    url: String,
}

impl AuthorizationRequest {
    /// Build the authorization URL for `config` with a fresh challenge
    #[must_use]
    pub fn new(config: &OAuthConfig) -> Self {
        Self::with_challenge(config, PkceChallenge::generate())
    }

    /// Build the authorization URL for `config` with a given challenge
    #[must_use]
    pub fn with_challenge(config: &OAuthConfig, challenge: PkceChallenge) -> Self {
        let params = [
            ("response_type", "code".to_string()),
            ("client_id", config.client_id.clone()),
            ("scope", config.scope_string()),
            ("code_challenge_method", challenge.challenge_method().to_string()),
            ("code_challenge", challenge.code_challenge.clone()),
            ("redirect_uri", config.redirect_uri.clone()),
            ("state", challenge.state.clone()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}?{}", config.authorization_endpoint, query_string);

        Self { challenge, redirect_uri: config.redirect_uri.clone(), url }
    }

    /// URL to open in the browser
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Verifier to present at code exchange
    #[must_use]
    pub fn verifier(&self) -> &str {
        &self.challenge.code_verifier
    }

    /// Expected `state` on the callback
    #[must_use]
    pub fn state(&self) -> &str {
        &self.challenge.state
    }

    /// Redirect URI the code was issued for
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Extract the authorization code from the redirect URL
    ///
    /// # Errors
    /// - `AuthorizationDenied` if the provider redirected with `error=`
    /// - `StateMismatch` if `state` is missing or differs
    /// - `MissingCode` if there is no non-empty `code` parameter
    /// - `ConfigError` if `callback_url` does not parse
    pub fn code_from_callback(&self, callback_url: &str) -> Result<String, OAuthClientError> {
        let url = Url::parse(callback_url)
            .map_err(|e| OAuthClientError::ConfigError(format!("Invalid callback URL: {e}")))?;

        let mut code = None;
        let mut state = None;
        let mut error = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            return Err(OAuthClientError::AuthorizationDenied(error));
        }

        let received = state.unwrap_or_default();
        if !validate_state(self.state(), &received) {
            return Err(OAuthClientError::StateMismatch {
                expected: self.state().to_string(),
                received,
            });
        }

        code.filter(|c| !c.is_empty()).ok_or(OAuthClientError::MissingCode)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::pkce.
    use super::*;

    fn config() -> OAuthConfig {
        OAuthConfig::spotify("client123", "obsidian://callback")
    }

    #[test]
    fn verifier_length_and_alphabet() {
        let verifier = generate_code_verifier();
        assert_eq!(verifier.len(), 64);
        assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    /// RFC 7636 appendix B test vector.
    #[test]
    fn challenge_matches_rfc_vector() {
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        assert_eq!(
            generate_code_challenge(verifier),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn challenges_are_unique() {
        let first = PkceChallenge::generate();
        let second = PkceChallenge::generate();

        assert_ne!(first.code_verifier, second.code_verifier);
        assert_ne!(first.state, second.state);
    }

    #[test]
    fn state_validation() {
        assert!(validate_state("abc", "abc"));
        assert!(!validate_state("abc", "abd"));
        assert!(!validate_state("abc", "abcd"));
        assert!(!validate_state("abc", ""));
    }

    #[test]
    fn authorization_url_carries_pkce_params() {
        let request = AuthorizationRequest::new(&config());
        let url = Url::parse(request.url()).unwrap();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(url.path(), "/authorize");

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["client_id"], "client123");
        assert_eq!(pairs["scope"], "user-read-currently-playing");
        assert_eq!(pairs["code_challenge_method"], "S256");
        assert_eq!(pairs["code_challenge"], generate_code_challenge(request.verifier()));
        assert_eq!(pairs["redirect_uri"], "obsidian://callback");
        assert_eq!(pairs["state"], request.state());
    }

    #[test]
    fn callback_yields_code() {
        let request = AuthorizationRequest::new(&config());
        let callback = format!("obsidian://callback?code=AQD123&state={}", request.state());

        assert_eq!(request.code_from_callback(&callback).unwrap(), "AQD123");
    }

    #[test]
    fn callback_without_code_is_rejected() {
        let request = AuthorizationRequest::new(&config());
        let callback = format!("obsidian://callback?state={}", request.state());

        assert!(matches!(
            request.code_from_callback(&callback),
            Err(OAuthClientError::MissingCode)
        ));
    }

    #[test]
    fn callback_with_error_is_denied() {
        let request = AuthorizationRequest::new(&config());
        let callback =
            format!("obsidian://callback?error=access_denied&state={}", request.state());

        assert!(matches!(
            request.code_from_callback(&callback),
            Err(OAuthClientError::AuthorizationDenied(reason)) if reason == "access_denied"
        ));
    }

    #[test]
    fn callback_with_wrong_state_is_rejected() {
        let request = AuthorizationRequest::new(&config());

        assert!(matches!(
            request.code_from_callback("obsidian://callback?code=AQD123&state=forged"),
            Err(OAuthClientError::StateMismatch { .. })
        ));
        assert!(matches!(
            request.code_from_callback("obsidian://callback?code=AQD123"),
            Err(OAuthClientError::StateMismatch { .. })
        ));
    }

    #[test]
    fn unparseable_callback_is_config_error() {
        let request = AuthorizationRequest::new(&config());
        assert!(matches!(
            request.code_from_callback("not a url"),
            Err(OAuthClientError::ConfigError(_))
        ));
    }
}
