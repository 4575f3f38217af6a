//! Configuration loader
//!
//! Loads application configuration from a file and environment variables.
//!
//! ## Loading Strategy
//! 1. An explicit path, when given, must exist and parse
//! 2. Otherwise probes the standard locations for a config file
//! 3. Falls back to built-in defaults when no file is found
//! 4. Applies environment overrides on top
//!
//! ## Environment Variables
//! - `SONGLINK_CLIENT_ID`: OAuth client id
//! - `SONGLINK_REDIRECT_URI`: OAuth redirect URI
//! - `SONGLINK_STORAGE_BACKEND`: `file`, `keychain` or `memory`
//! - `SONGLINK_STORAGE_PATH`: File backend location
//! - `SONGLINK_LOG_LEVEL`: Log filter directive
//! - `SONGLINK_REFRESH_LEEWAY`: Seconds before expiry to refresh early
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./songlink.toml` or `./songlink.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `<config dir>/songlink/config.toml` (platform config directory)

use std::path::{Path, PathBuf};

use songlink_domain::{Config, Result, SongLinkError, StorageBackend};

/// Load configuration with automatic fallback strategy
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`] and then defaults.
///
/// # Errors
/// Returns `SongLinkError::Config` if:
/// - An explicit file is missing
/// - A file's format is invalid
/// - An environment override has an invalid value
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => load_from_file(&path)?,
        None => match probe_config_paths() {
            Some(path) => load_from_file(&path)?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(config)
}

/// Load configuration from a file
///
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SongLinkError::Config` if the file is missing, unreadable or
/// invalid.
pub fn load_from_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(SongLinkError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| SongLinkError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, path)
}

/// Apply `SONGLINK_*` environment overrides
///
/// # Errors
/// Returns `SongLinkError::Config` if a variable has an invalid value.
pub fn apply_env_overrides(mut config: Config) -> Result<Config> {
    if let Some(client_id) = env_var("SONGLINK_CLIENT_ID") {
        config.oauth.client_id = client_id;
    }
    if let Some(redirect_uri) = env_var("SONGLINK_REDIRECT_URI") {
        config.oauth.redirect_uri = redirect_uri;
    }
    if let Some(leeway) = env_var("SONGLINK_REFRESH_LEEWAY") {
        config.oauth.refresh_leeway_seconds = leeway.parse::<i64>().map_err(|e| {
            SongLinkError::Config(format!("Invalid refresh leeway '{}': {}", leeway, e))
        })?;
    }
    if let Some(backend) = env_var("SONGLINK_STORAGE_BACKEND") {
        config.storage.backend = backend.parse::<StorageBackend>().map_err(SongLinkError::Config)?;
    }
    if let Some(path) = env_var("SONGLINK_STORAGE_PATH") {
        config.storage.path = Some(PathBuf::from(path));
    }
    if let Some(level) = env_var("SONGLINK_LOG_LEVEL") {
        config.logging.level = level;
    }

    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `SongLinkError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SongLinkError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SongLinkError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SongLinkError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe standard paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend([
            cwd.join("songlink.toml"),
            cwd.join("songlink.json"),
            cwd.join("config.toml"),
            cwd.join("config.json"),
        ]);
    }

    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("songlink").join("config.toml"));
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Non-empty environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
