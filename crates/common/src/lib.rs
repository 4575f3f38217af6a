//! Token lifecycle utilities shared across the song link crates.
//!
//! # Modules
//!
//! - `auth`: OAuth 2.0 + PKCE token lifecycle (codec, expiry policy, token
//!   store, refresh orchestration, exchange client)
//! - `storage`: key-value persistence contract and an in-memory backend
//! - `time`: injectable wall clock
//! - `testing`: in-memory doubles (enable the `test-utils` feature)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod storage;
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use time::{Clock, SystemClock};
