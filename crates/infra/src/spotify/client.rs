//! Spotify Web API adapter for the [`MusicApi`] port

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use songlink_core::MusicApi;
use songlink_domain::{Result, Song, SongLinkError, SpotifyProfile, DEFAULT_API_BASE_URL};
use tracing::debug;

use super::transport::{ApiTransport, RetryPolicy};
use crate::errors::InfraError;

#[derive(Debug, Deserialize)]
struct CurrentlyPlaying {
    #[serde(default)]
    is_playing: bool,
    item: Option<PlayingItem>,
}

#[derive(Debug, Deserialize)]
struct PlayingItem {
    name: String,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

/// Bearer-authenticated client for `https://api.spotify.com/v1`
#[derive(Debug, Clone)]
pub struct SpotifyApiClient {
    transport: ApiTransport,
    base_url: String,
}

impl SpotifyApiClient {
    /// Client against the public Spotify API
    ///
    /// # Errors
    /// Returns `Network` if the HTTP client cannot be built
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL, RetryPolicy::default())
    }

    /// Client against `base_url` (no trailing slash needed)
    ///
    /// # Errors
    /// Returns `Network` if the HTTP client cannot be built
    pub fn with_base_url(base_url: impl Into<String>, retry: RetryPolicy) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { transport: ApiTransport::new(retry)?, base_url })
    }

    async fn get(&self, path: &str, access_token: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        self.transport.get(&url, access_token).await
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    response.error_for_status().map_err(|e| SongLinkError::from(InfraError::from(e)))
}

#[async_trait]
impl MusicApi for SpotifyApiClient {
    async fn currently_playing(&self, access_token: &str) -> Result<Option<Song>> {
        let response = self.get("/me/player/currently-playing", access_token).await?;
        if response.status() == StatusCode::NO_CONTENT {
            debug!("Playback idle");
            return Ok(None);
        }

        let body: CurrentlyPlaying = check_status(response)?
            .json()
            .await
            .map_err(|e| SongLinkError::from(InfraError::from(e)))?;

        if !body.is_playing {
            return Ok(None);
        }

        Ok(body.item.and_then(|item| {
            let link = item.external_urls.spotify?;
            Some(Song { name: item.name, link })
        }))
    }

    async fn profile(&self, access_token: &str) -> Result<SpotifyProfile> {
        let response = check_status(self.get("/me", access_token).await?)?;
        response.json().await.map_err(|e| SongLinkError::from(InfraError::from(e)))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> SpotifyApiClient {
        SpotifyApiClient::with_base_url(format!("{}/v1/", server.uri()), RetryPolicy::none())
            .unwrap()
    }

    #[test]
    fn default_client_targets_public_api() {
        let client = SpotifyApiClient::new().unwrap();

        assert_eq!(client.base_url, DEFAULT_API_BASE_URL.trim_end_matches('/'));
    }

    #[tokio::test]
    async fn playing_track_becomes_song() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .and(header("authorization", "Bearer A1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "is_playing": true,
                "progress_ms": 1200,
                "item": {
                    "name": "Roygbiv",
                    "external_urls": {"spotify": "https://open.spotify.com/track/r"}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let song = client_for(&server).currently_playing("A1").await.unwrap();

        assert_eq!(
            song,
            Some(Song {
                name: "Roygbiv".to_string(),
                link: "https://open.spotify.com/track/r".to_string()
            })
        );
    }

    #[tokio::test]
    async fn no_content_is_nothing_playing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).currently_playing("A1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn paused_playback_is_nothing_playing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "is_playing": false,
                "item": {"name": "x", "external_urls": {"spotify": "https://open.spotify.com/track/x"}}
            })))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).currently_playing("A1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_item_is_nothing_playing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"is_playing": true, "item": null})),
            )
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).currently_playing("A1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rejected_token_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"status": 401, "message": "The access token expired"}
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).currently_playing("stale").await;

        assert!(matches!(result, Err(SongLinkError::Auth(_))));
    }

    #[tokio::test]
    async fn profile_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .and(header("authorization", "Bearer A1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "wizzler",
                "display_name": "Wizzler",
                "external_urls": {"spotify": "https://open.spotify.com/user/wizzler"},
                "images": [{"url": "https://i.scdn.co/image/a", "height": 64, "width": 64}]
            })))
            .mount(&server)
            .await;

        let profile = client_for(&server).profile("A1").await.unwrap();

        assert_eq!(profile.name(), "Wizzler");
        assert_eq!(profile.image_url(), Some("https://i.scdn.co/image/a"));
    }
}
