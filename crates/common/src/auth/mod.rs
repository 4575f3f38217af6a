//! OAuth 2.0 + PKCE token lifecycle
//!
//! Keeps one Spotify access token usable across sessions: persisted through
//! an injected key-value backend, refreshed transparently once it expires,
//! and cleared on disconnect.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenManager   │  Refresh-on-read orchestrator
//! └────────┬────────┘
//!          │
//!          ├──► TokenExchangeClient  (OAuthClient: HTTP token endpoint)
//!          ├──► TokenStore           (one record under `<namespace>-token`)
//!          │         │
//!          │         └──► codec      (JSON form + validation)
//!          │
//!          └──► ExpiryPolicy         (strict `now > expires_at`)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use songlink_common::auth::{
//!     AuthorizationRequest, OAuthClient, OAuthConfig, TokenManager, TokenStore, DEFAULT_NAMESPACE,
//! };
//! use songlink_common::storage::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OAuthConfig::spotify("your_client_id", "obsidian://callback");
//!     let client = Arc::new(OAuthClient::new(config.clone()));
//!     let store = TokenStore::new(Arc::new(MemoryStore::new()), DEFAULT_NAMESPACE);
//!     let manager = TokenManager::new(client, store);
//!
//!     // Send the user to the provider
//!     let request = AuthorizationRequest::new(&config);
//!     println!("Open this URL in your browser: {}", request.url());
//!
//!     // ... provider redirects to obsidian://callback?code=...&state=... ...
//!     let callback = "obsidian://callback?code=AQD&state=...";
//!     manager.complete_authorization(&request, callback).await?;
//!
//!     // Refreshes transparently once expired
//!     if let Some(token) = manager.get_token().await {
//!         println!("Bearer {}", token.access_token);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenRecord`, `TokenExchangeResult`, `OAuthConfig`
//! - **[`codec`]**: persisted string form of a record
//! - **[`expiry`]**: when a record needs a refresh
//! - **[`store`]**: persistence of the single record
//! - **[`pkce`]**: PKCE challenge and authorization request
//! - **[`client`]**: HTTP client for the token endpoint
//! - **[`token_manager`]**: refresh orchestration

pub mod client;
pub mod codec;
pub mod expiry;
pub mod pkce;
pub mod store;
pub mod token_manager;
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
pub use client::{OAuthClient, OAuthClientError};
pub use codec::CodecError;
pub use expiry::{is_expired, ExpiryPolicy};
pub use pkce::{AuthorizationRequest, PkceChallenge};
// Re-export PKCE utility functions
pub use pkce::{generate_code_challenge, generate_code_verifier, generate_state, validate_state};
pub use store::{token_key, TokenStore, DEFAULT_NAMESPACE};
pub use token_manager::{TokenManager, TokenManagerError};
pub use traits::TokenExchangeClient;
pub use types::{OAuthConfig, OAuthError, TokenExchangeResult, TokenRecord};
