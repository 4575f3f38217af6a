//! Shared test helpers for `songlink-core` integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use songlink_core::MusicApi;
use songlink_domain::{Result, Song, SongLinkError, SpotifyProfile};

/// Music API double that answers from fixed data and records bearer tokens
#[derive(Default)]
pub struct StubMusicApi {
    pub playing: Option<Song>,
    pub profile: Option<SpotifyProfile>,
    bearer_tokens: Mutex<Vec<String>>,
}

impl StubMusicApi {
    pub fn playing(name: &str, link: &str) -> Arc<Self> {
        Arc::new(Self {
            playing: Some(Song { name: name.to_string(), link: link.to_string() }),
            ..Self::default()
        })
    }

    pub fn bearer_tokens(&self) -> Vec<String> {
        self.bearer_tokens.lock().unwrap().clone()
    }

    fn record(&self, access_token: &str) {
        self.bearer_tokens.lock().unwrap().push(access_token.to_string());
    }
}

#[async_trait]
impl MusicApi for StubMusicApi {
    async fn currently_playing(&self, access_token: &str) -> Result<Option<Song>> {
        self.record(access_token);
        Ok(self.playing.clone())
    }

    async fn profile(&self, access_token: &str) -> Result<SpotifyProfile> {
        self.record(access_token);
        self.profile.clone().ok_or_else(|| SongLinkError::Network("no profile".into()))
    }
}
