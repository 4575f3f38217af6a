//! Settable clock for deterministic expiry tests

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::time::Clock;

/// Mock clock pinned to a UNIX second
///
/// Clones share the same reading, so a test can keep one handle and give the
/// other to the code under test.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-utils")]
/// # {
/// use songlink_common::testing::MockClock;
/// use songlink_common::time::Clock;
///
/// let clock = MockClock::at(0);
/// clock.set(1500);
/// assert_eq!(clock.unix_seconds(), 1500);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Arc<AtomicI64>,
}

impl MockClock {
    /// Create a clock reading `unix_seconds`
    #[must_use]
    pub fn at(unix_seconds: i64) -> Self {
        Self { now: Arc::new(AtomicI64::new(unix_seconds)) }
    }

    /// Jump to an absolute reading
    pub fn set(&self, unix_seconds: i64) {
        self.now.store(unix_seconds, Ordering::SeqCst);
    }

    /// Move the clock forward by `seconds`
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn system_time(&self) -> SystemTime {
        let secs = u64::try_from(self.now.load(Ordering::SeqCst)).unwrap_or(0);
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn unix_seconds(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for testing::time.
    use super::*;

    #[test]
    fn clones_share_reading() {
        let clock = MockClock::at(10);
        let other = clock.clone();

        clock.advance(5);

        assert_eq!(other.unix_seconds(), 15);
    }

    #[test]
    fn system_time_tracks_seconds() {
        let clock = MockClock::at(1000);
        assert_eq!(clock.system_time(), UNIX_EPOCH + Duration::from_secs(1000));
    }
}
