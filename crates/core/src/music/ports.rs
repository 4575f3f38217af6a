//! Port interfaces for the song link use cases
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use songlink_common::auth::{
    AuthorizationRequest, TokenExchangeClient, TokenManager, TokenRecord,
};
use songlink_common::storage::KeyValueStore;
use songlink_domain::{Result, Song, SpotifyProfile};

use crate::errors::IntoSongLinkError;

/// Trait for the music provider's Web API
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Track playing right now, `None` when playback is paused or idle
    async fn currently_playing(&self, access_token: &str) -> Result<Option<Song>>;

    /// Profile of the account that owns `access_token`
    async fn profile(&self, access_token: &str) -> Result<SpotifyProfile>;
}

/// Trait for obtaining and managing the user's access token
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// A usable token, refreshed if needed; `None` when not connected
    async fn current_token(&self) -> Option<TokenRecord>;

    /// Exchange the code on `callback_url` and persist the token
    async fn complete_authorization(
        &self,
        request: &AuthorizationRequest,
        callback_url: &str,
    ) -> Result<TokenRecord>;

    /// Forget the stored token
    async fn disconnect(&self) -> Result<()>;
}

#[async_trait]
impl<C, S> TokenSource for TokenManager<C, S>
where
    C: TokenExchangeClient + ?Sized,
    S: KeyValueStore + ?Sized,
{
    async fn current_token(&self) -> Option<TokenRecord> {
        self.get_token().await
    }

    async fn complete_authorization(
        &self,
        request: &AuthorizationRequest,
        callback_url: &str,
    ) -> Result<TokenRecord> {
        TokenManager::complete_authorization(self, request, callback_url)
            .await
            .map_err(IntoSongLinkError::into_songlink)
    }

    async fn disconnect(&self) -> Result<()> {
        self.clear_token().await.map_err(IntoSongLinkError::into_songlink)
    }
}
