//! # Song Link Domain
//!
//! Domain types shared by the song link crates.
//!
//! This crate contains:
//! - Domain error type and Result definition
//! - Configuration structures
//! - Spotify payload types (`Song`, `SpotifyProfile`)
//!
//! ## Architecture
//! - No dependencies on other song link crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
