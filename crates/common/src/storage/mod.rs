//! Key-value storage primitives
//!
//! The token lifecycle persists exactly one string record; this module
//! defines the contract it persists through and an in-memory backend.
//! File and keychain backends live in `songlink-infra`.

pub mod error;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
