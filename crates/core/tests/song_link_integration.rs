//! Integration tests for the song link use case
//!
//! Wires `SongLinkService` to a real `TokenManager` over in-memory storage so
//! refresh-on-read is observed through the consumer.

mod support;

use std::sync::Arc;

use songlink_common::auth::{
    codec, OAuthClientError, OAuthConfig, TokenExchangeClient, TokenExchangeResult, TokenManager,
    TokenRecord, TokenStore, DEFAULT_NAMESPACE,
};
use songlink_common::storage::KeyValueStore;
use songlink_common::testing::{MemoryStore, MockClock, MockExchangeClient};
use songlink_core::{NoticeFlags, SongLinkService};
use songlink_domain::SongLinkError;
use support::StubMusicApi;

const TOKEN_KEY: &str = "obsidian-song-links-token";

struct Fixture {
    backend: Arc<MemoryStore>,
    client: Arc<MockExchangeClient>,
    music: Arc<StubMusicApi>,
    service: SongLinkService,
}

fn fixture(now: i64, music: Arc<StubMusicApi>) -> Fixture {
    let backend = Arc::new(MemoryStore::new());
    let client = Arc::new(MockExchangeClient::new());

    let exchange: Arc<dyn TokenExchangeClient> = client.clone();
    let storage: Arc<dyn KeyValueStore> = backend.clone();
    let manager = TokenManager::new(exchange, TokenStore::new(storage, DEFAULT_NAMESPACE))
        .with_clock(Arc::new(MockClock::at(now)));

    let service = SongLinkService::new(
        Arc::new(manager),
        music.clone(),
        OAuthConfig::spotify("client", "obsidian://callback"),
    );
    Fixture { backend, client, music, service }
}

fn seed(backend: &MemoryStore, access: &str, refresh: &str, expires_at: i64) {
    let record = TokenRecord {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_at,
    };
    backend.insert(TOKEN_KEY, codec::encode(&record));
}

fn exchange(access: &str, refresh: &str, expires_in: i64) -> TokenExchangeResult {
    TokenExchangeResult {
        access_token: access.to_string(),
        refresh_token: Some(refresh.to_string()),
        expires_in,
        token_type: "Bearer".to_string(),
        scope: "user-read-currently-playing".to_string(),
    }
}

/// Scenario: the stored token expired while the app was closed
#[tokio::test]
async fn test_song_link_refreshes_expired_token_first() {
    let f = fixture(1500, StubMusicApi::playing("Xtal", "https://open.spotify.com/track/x"));
    seed(&f.backend, "A1", "R1", 1000);
    f.client.push_refresh(Ok(exchange("A2", "R2", 3600)));

    let link = f.service.song_link().await.unwrap();

    assert_eq!(link, "[Xtal](https://open.spotify.com/track/x)");
    assert_eq!(f.music.bearer_tokens(), vec!["A2".to_string()]);
    assert_eq!(f.client.refresh_tokens_seen(), vec!["R1".to_string()]);
}

/// Scenario: provider outage during refresh; the stale token is still tried
#[tokio::test]
async fn test_song_link_falls_back_to_stale_token() {
    let f = fixture(1500, StubMusicApi::playing("Xtal", "https://open.spotify.com/track/x"));
    seed(&f.backend, "A1", "R1", 1000);
    f.client.push_refresh(Err(OAuthClientError::HttpStatus { status: 502, body: String::new() }));

    f.service.song_link().await.unwrap();

    assert_eq!(f.music.bearer_tokens(), vec!["A1".to_string()]);
}

/// Scenario: never connected
#[tokio::test]
async fn test_song_link_without_connection() {
    let f = fixture(1500, StubMusicApi::playing("Xtal", "https://open.spotify.com/track/x"));

    assert_eq!(f.service.song_link().await, Err(SongLinkError::NotConnected));
    assert!(f.music.bearer_tokens().is_empty());
    assert_eq!(f.client.refresh_calls(), 0);
}

/// Scenario: connect through the browser, then disconnect
#[tokio::test]
async fn test_connect_and_disconnect() {
    let f = fixture(100, Arc::new(StubMusicApi::default()));
    f.client.push_code(Ok(exchange("A1", "R1", 3600)));

    let request = f.service.start_connect();
    let callback = format!("obsidian://callback?code=AQD&state={}", request.state());
    let record = f.service.complete_connect(&request, &callback).await.unwrap();

    assert_eq!(record.expires_at, 3700);
    assert_eq!(f.service.connection().await, Some(record));

    f.service.disconnect().await.unwrap();

    assert_eq!(f.service.connection().await, None);
    assert_eq!(f.backend.snapshot(TOKEN_KEY), None);
}

/// Scenario: the user denies access in the browser
#[tokio::test]
async fn test_denied_connect_is_auth_error() {
    let f = fixture(100, Arc::new(StubMusicApi::default()));

    let request = f.service.start_connect();
    let callback = format!("obsidian://callback?error=access_denied&state={}", request.state());
    let result = f.service.complete_connect(&request, &callback).await;

    assert!(matches!(result, Err(SongLinkError::Auth(_))));
    assert!(f.client.code_exchanges_seen().is_empty());
    assert_eq!(f.service.connection().await, None);
}

/// Scenario: the notice flag shares the token backend without clashing
#[tokio::test]
async fn test_notice_flag_survives_disconnect() {
    let f = fixture(100, Arc::new(StubMusicApi::default()));
    seed(&f.backend, "A1", "R1", 9999);
    let flags = NoticeFlags::new(f.backend.clone(), DEFAULT_NAMESPACE);

    flags.mark_notified().await;
    f.service.disconnect().await.unwrap();

    assert!(flags.has_notified().await);
    assert_eq!(f.backend.len(), 1);
}
