//! Time abstraction for testability
//!
//! Token expiry is judged against wall-clock seconds since the UNIX epoch.
//! Everything that needs "now" takes a [`Clock`] so tests can pin or advance
//! time without waiting.
//!
//! # Examples
//!
//! ```
//! use songlink_common::time::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! assert!(clock.unix_seconds() > 0);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for wall-clock readings
pub trait Clock: Send + Sync {
    /// Get current system time (wall clock)
    fn system_time(&self) -> SystemTime;

    /// Get whole seconds since UNIX epoch
    ///
    /// Readings before the epoch collapse to zero.
    fn unix_seconds(&self) -> i64 {
        let secs = self.system_time().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        i64::try_from(secs).unwrap_or(i64::MAX)
    }
}

/// Real system clock implementation
///
/// Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}
