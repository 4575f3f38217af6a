//! Testing utilities and helpers
//!
//! In-memory doubles for the token lifecycle seams:
//! - **[`mocks`]**: scripted [`TokenExchangeClient`](crate::auth::TokenExchangeClient)
//!   and a key-value backend that always fails
//! - **[`time`]**: a settable [`Clock`](crate::time::Clock)
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # {
//! use songlink_common::testing::MockClock;
//! use songlink_common::time::Clock;
//!
//! let clock = MockClock::at(1000);
//! clock.advance(500);
//! assert_eq!(clock.unix_seconds(), 1500);
//! # }
//! ```

pub mod mocks;
pub mod time;

pub use mocks::{FailingStore, MockExchangeClient};
pub use time::MockClock;

pub use crate::storage::MemoryStore;
