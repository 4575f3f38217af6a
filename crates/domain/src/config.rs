//! Configuration management
//!
//! Every section has defaults, so a config file only needs the keys it
//! changes. Defaults target Spotify and the plugin's public client id.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::impl_choice_conversions;

/// Spotify authorization endpoint
pub const DEFAULT_AUTHORIZE_ENDPOINT: &str = "https://accounts.spotify.com/authorize";
/// Spotify token endpoint
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";
/// Spotify Web API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
/// Public (secretless) client id registered for the plugin
pub const DEFAULT_CLIENT_ID: &str = "f73730e86de14041b47fc683e619fd8b";
/// Redirect URI registered for the plugin
pub const DEFAULT_REDIRECT_URI: &str = "obsidian://callback";
/// Only scope the plugin asks for
pub const DEFAULT_SCOPE: &str = "user-read-currently-playing";
/// Prefix for every persisted key
pub const DEFAULT_NAMESPACE: &str = "obsidian-song-links";
/// Keychain service name used by the keychain backend
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "songlink";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub oauth: OAuthSettings,
    pub storage: StorageSettings,
    pub logging: LoggingConfig,
}

/// OAuth provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthSettings {
    pub client_id: String,
    pub authorize_endpoint: String,
    pub token_endpoint: String,
    pub api_base_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Refresh this many seconds before expiry; 0 refreshes only once
    /// `now > expires_at`
    pub refresh_leeway_seconds: i64,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            authorize_endpoint: DEFAULT_AUTHORIZE_ENDPOINT.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: vec![DEFAULT_SCOPE.to_string()],
            refresh_leeway_seconds: 0,
        }
    }
}

/// Where the token record and flags are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON object file on disk
    #[default]
    File,
    /// Platform credential store
    Keychain,
    /// Process memory; nothing survives exit
    Memory,
}

impl_choice_conversions!(StorageBackend {
    File => "file",
    Keychain => "keychain",
    Memory => "memory",
});

/// Storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// File backend location; `None` uses the platform data directory
    pub path: Option<PathBuf>,
    pub namespace: String,
    pub keychain_service: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl_choice_conversions!(LogFormat {
    Pretty => "pretty",
    Json => "json",
});

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::default() }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for config.
    use super::*;

    #[test]
    fn defaults_target_spotify() {
        let config = Config::default();

        assert_eq!(config.oauth.client_id, "f73730e86de14041b47fc683e619fd8b");
        assert_eq!(config.oauth.token_endpoint, "https://accounts.spotify.com/api/token");
        assert_eq!(config.oauth.scopes, vec!["user-read-currently-playing"]);
        assert_eq!(config.oauth.refresh_leeway_seconds, 0);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.namespace, "obsidian-song-links");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"storage":{"backend":"keychain"}}"#).unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Keychain);
        assert_eq!(config.storage.keychain_service, "songlink");
        assert_eq!(config.oauth, OAuthSettings::default());
    }

    #[test]
    fn backend_parses_from_env_strings() {
        assert_eq!("Keychain".parse::<StorageBackend>(), Ok(StorageBackend::Keychain));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("sqlite".parse::<StorageBackend>().is_err());
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
    }
}
