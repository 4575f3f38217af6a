//! # Song Link Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits)
//! - Use cases: insert the playing song, show the profile, connect and
//!   disconnect the account
//! - Conversions from library errors into the domain error
//!
//! ## Architecture Principles
//! - Only depends on `songlink-common` and `songlink-domain`
//! - No HTTP, file or keychain code
//! - All external dependencies via traits

pub mod errors;
pub mod music;
pub mod notice;

// Re-export specific items to avoid ambiguity
pub use errors::{CoreError, IntoSongLinkError};
pub use music::ports::{MusicApi, TokenSource};
pub use music::SongLinkService;
pub use notice::NoticeFlags;
