//! # Song Link Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (TOML/JSON files plus environment overrides)
//! - Key-value backends (JSON file, platform keychain)
//! - Spotify Web API adapter with rate-limit aware retries
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `songlink-core` and `songlink-common`
//! - Depends on `songlink-domain` and `songlink-core`
//! - Contains all "impure" code (I/O, network, keychain)

pub mod config;
pub mod errors;
pub mod observability;
pub mod spotify;
pub mod storage;

// Re-export commonly used items
pub use errors::InfraError;
pub use observability::init_tracing;
pub use spotify::{RetryPolicy, SpotifyApiClient};
pub use storage::{build_store, FileStore, KeychainStore};
