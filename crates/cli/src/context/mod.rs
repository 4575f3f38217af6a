//! Application context - wires config, storage, auth and the Spotify client

use std::sync::Arc;

use songlink_common::auth::{
    ExpiryPolicy, OAuthClient, OAuthConfig, TokenExchangeClient, TokenManager, TokenStore,
};
use songlink_common::storage::KeyValueStore;
use songlink_core::{MusicApi, NoticeFlags, SongLinkService};
use songlink_domain::{Config, OAuthSettings, Result};
use songlink_infra::{build_store, RetryPolicy, SpotifyApiClient};
use tracing::debug;

/// Token manager over trait objects, as built from config
pub type DynTokenManager = TokenManager<dyn TokenExchangeClient, dyn KeyValueStore>;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub tokens: Arc<DynTokenManager>,
    pub service: SongLinkService,
    pub notices: NoticeFlags,
}

impl AppContext {
    /// Build every service from `config`
    ///
    /// # Errors
    /// Returns `Config` if the storage location cannot be resolved, `Network`
    /// if the HTTP client cannot be built
    pub fn new(config: Config) -> Result<Self> {
        let music: Arc<dyn MusicApi> = Arc::new(SpotifyApiClient::with_base_url(
            config.oauth.api_base_url.clone(),
            RetryPolicy::default(),
        )?);
        Self::with_music_api(config, music)
    }

    /// Build the context around a given music API
    ///
    /// # Errors
    /// Returns `Config` if the storage location cannot be resolved
    pub fn with_music_api(config: Config, music: Arc<dyn MusicApi>) -> Result<Self> {
        let backend = build_store(&config.storage)?;
        let oauth = oauth_config(&config.oauth);

        let exchange: Arc<dyn TokenExchangeClient> = Arc::new(OAuthClient::new(oauth.clone()));
        let tokens: Arc<DynTokenManager> = Arc::new(
            TokenManager::new(exchange, TokenStore::new(backend.clone(), &config.storage.namespace))
                .with_policy(ExpiryPolicy::with_leeway(config.oauth.refresh_leeway_seconds)),
        );

        let service = SongLinkService::new(tokens.clone(), music, oauth);
        let notices = NoticeFlags::new(backend, &config.storage.namespace);

        debug!(
            backend = %config.storage.backend,
            namespace = %config.storage.namespace,
            "Application context ready"
        );

        Ok(Self { config, tokens, service, notices })
    }
}

/// OAuth client settings from the `[oauth]` config section
#[must_use]
pub fn oauth_config(settings: &OAuthSettings) -> OAuthConfig {
    OAuthConfig::new(
        settings.client_id.clone(),
        settings.authorize_endpoint.clone(),
        settings.token_endpoint.clone(),
        settings.redirect_uri.clone(),
        settings.scopes.clone(),
    )
}

#[cfg(test)]
mod tests {
    use songlink_domain::StorageBackend;

    use super::*;

    fn memory_config() -> Config {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        config
    }

    #[test]
    fn oauth_config_mirrors_settings() {
        let settings = OAuthSettings {
            client_id: "cid".into(),
            redirect_uri: "http://127.0.0.1:8888/callback".into(),
            ..OAuthSettings::default()
        };

        let oauth = oauth_config(&settings);

        assert_eq!(oauth.client_id, "cid");
        assert_eq!(oauth.redirect_uri, "http://127.0.0.1:8888/callback");
        assert_eq!(oauth.token_endpoint, settings.token_endpoint);
        assert_eq!(oauth.scope_string(), "user-read-currently-playing");
    }

    #[tokio::test]
    async fn memory_context_starts_disconnected() {
        let ctx = AppContext::new(memory_config()).unwrap();

        assert_eq!(ctx.service.connection().await, None);
        assert!(!ctx.notices.has_notified().await);
    }

    #[tokio::test]
    async fn connect_url_uses_configured_client() {
        let mut config = memory_config();
        config.oauth.client_id = "my-client".into();
        let ctx = AppContext::new(config).unwrap();

        let request = ctx.service.start_connect();

        assert!(request.url().starts_with("https://accounts.spotify.com/authorize?"));
        assert!(request.url().contains("client_id=my-client"));
    }
}
