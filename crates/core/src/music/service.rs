//! Song link service - core business logic

use std::sync::Arc;

use songlink_common::auth::{AuthorizationRequest, OAuthConfig, TokenRecord};
use songlink_domain::{Result, Song, SongLinkError, SpotifyProfile};
use tracing::{debug, info, warn};

use super::ports::{MusicApi, TokenSource};

/// Insert-song-link use case plus account management
pub struct SongLinkService {
    tokens: Arc<dyn TokenSource>,
    music: Arc<dyn MusicApi>,
    oauth: OAuthConfig,
}

impl SongLinkService {
    /// Create a new song link service
    pub fn new(tokens: Arc<dyn TokenSource>, music: Arc<dyn MusicApi>, oauth: OAuthConfig) -> Self {
        Self { tokens, music, oauth }
    }

    /// Markdown link `[name](link)` for the song playing now
    ///
    /// # Errors
    /// - `NotConnected` when no token is stored
    /// - `NothingPlaying` when playback is idle
    /// - whatever the music API reports otherwise
    pub async fn song_link(&self) -> Result<String> {
        let song = self.current_song().await?;
        info!(song = %song.name, "Added song link");
        Ok(song.markdown_link())
    }

    /// The song playing now
    ///
    /// # Errors
    /// Same as [`Self::song_link`]
    pub async fn current_song(&self) -> Result<Song> {
        let token = self.require_token().await?;
        match self.music.currently_playing(&token.access_token).await {
            Ok(Some(song)) => Ok(song),
            Ok(None) => Err(SongLinkError::NothingPlaying),
            Err(e) => {
                warn!(error = %e, "Could not fetch currently playing song");
                Err(e)
            }
        }
    }

    /// Profile of the connected account
    ///
    /// # Errors
    /// `NotConnected` when no token is stored, otherwise the music API error
    pub async fn profile(&self) -> Result<SpotifyProfile> {
        let token = self.require_token().await?;
        self.music.profile(&token.access_token).await.inspect_err(|e| {
            warn!(error = %e, "Could not show profile");
        })
    }

    /// Start connecting: a fresh authorization request whose URL the user
    /// opens in a browser
    #[must_use]
    pub fn start_connect(&self) -> AuthorizationRequest {
        let request = AuthorizationRequest::new(&self.oauth);
        debug!(redirect_uri = %request.redirect_uri(), "Authorization request created");
        request
    }

    /// Finish connecting with the URL the provider redirected to
    ///
    /// # Errors
    /// Returns `Auth` if the callback is unusable or the exchange fails;
    /// stored state is unchanged in that case
    pub async fn complete_connect(
        &self,
        request: &AuthorizationRequest,
        callback_url: &str,
    ) -> Result<TokenRecord> {
        let record = self.tokens.complete_authorization(request, callback_url).await?;
        info!("Spotify connected");
        Ok(record)
    }

    /// Disconnect: forget the stored token
    ///
    /// # Errors
    /// Returns `Storage` if the backend cannot remove the record
    pub async fn disconnect(&self) -> Result<()> {
        self.tokens.disconnect().await?;
        info!("Spotify disconnected");
        Ok(())
    }

    /// Current token if connected, refreshed if it had expired
    pub async fn connection(&self) -> Option<TokenRecord> {
        self.tokens.current_token().await
    }

    async fn require_token(&self) -> Result<TokenRecord> {
        self.tokens.current_token().await.ok_or(SongLinkError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for music::service.
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct FixedTokens(Option<TokenRecord>);

    #[async_trait]
    impl TokenSource for FixedTokens {
        async fn current_token(&self) -> Option<TokenRecord> {
            self.0.clone()
        }

        async fn complete_authorization(
            &self,
            _request: &AuthorizationRequest,
            _callback_url: &str,
        ) -> Result<TokenRecord> {
            Err(SongLinkError::Auth("not scripted".into()))
        }

        async fn disconnect(&self) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingApi {
        playing: Option<Song>,
        tokens_seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MusicApi for RecordingApi {
        async fn currently_playing(&self, access_token: &str) -> Result<Option<Song>> {
            self.tokens_seen.lock().unwrap().push(access_token.to_string());
            Ok(self.playing.clone())
        }

        async fn profile(&self, _access_token: &str) -> Result<SpotifyProfile> {
            Err(SongLinkError::Network("offline".into()))
        }
    }

    fn token() -> TokenRecord {
        TokenRecord {
            access_token: "A1".to_string(),
            refresh_token: "R1".to_string(),
            expires_at: i64::MAX,
        }
    }

    fn service(tokens: Option<TokenRecord>, api: Arc<RecordingApi>) -> SongLinkService {
        SongLinkService::new(
            Arc::new(FixedTokens(tokens)),
            api,
            OAuthConfig::spotify("client", "obsidian://callback"),
        )
    }

    #[tokio::test]
    async fn song_link_uses_current_token() {
        let api = Arc::new(RecordingApi {
            playing: Some(Song {
                name: "Windowlicker".into(),
                link: "https://open.spotify.com/track/1".into(),
            }),
            ..Default::default()
        });

        let link = service(Some(token()), api.clone()).song_link().await.unwrap();

        assert_eq!(link, "[Windowlicker](https://open.spotify.com/track/1)");
        assert_eq!(*api.tokens_seen.lock().unwrap(), vec!["A1".to_string()]);
    }

    #[tokio::test]
    async fn not_connected_skips_the_api() {
        let api = Arc::new(RecordingApi::default());

        let result = service(None, api.clone()).song_link().await;

        assert_eq!(result, Err(SongLinkError::NotConnected));
        assert!(api.tokens_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn idle_playback_is_nothing_playing() {
        let result = service(Some(token()), Arc::new(RecordingApi::default())).song_link().await;
        assert_eq!(result, Err(SongLinkError::NothingPlaying));
    }

    #[tokio::test]
    async fn profile_errors_propagate() {
        let result = service(Some(token()), Arc::new(RecordingApi::default())).profile().await;
        assert!(matches!(result, Err(SongLinkError::Network(_))));
    }

    #[test]
    fn start_connect_targets_configured_redirect() {
        let request = service(None, Arc::new(RecordingApi::default())).start_connect();

        assert_eq!(request.redirect_uri(), "obsidian://callback");
        assert!(request.url().starts_with("https://accounts.spotify.com/authorize?"));
    }
}
