//! Expiration policy
//!
//! Pure functions over a record and a clock reading. A token whose
//! `expires_at` equals `now` is still valid for that instant.

use super::types::TokenRecord;

/// Whether `record` is past its expiry at `now` (seconds since epoch)
#[must_use]
pub fn is_expired(record: &TokenRecord, now: i64) -> bool {
    now > record.expires_at
}

/// When the orchestrator should treat a record as stale
///
/// `refresh_leeway_seconds` moves the refresh point earlier than the hard
/// expiry. A leeway of zero is exactly [`is_expired`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryPolicy {
    refresh_leeway_seconds: i64,
}

impl ExpiryPolicy {
    /// Policy that refreshes `refresh_leeway_seconds` before expiry
    ///
    /// Negative values are clamped to zero.
    #[must_use]
    pub fn with_leeway(refresh_leeway_seconds: i64) -> Self {
        Self { refresh_leeway_seconds: refresh_leeway_seconds.max(0) }
    }

    /// Configured leeway in seconds
    #[must_use]
    pub fn refresh_leeway(&self) -> i64 {
        self.refresh_leeway_seconds
    }

    /// Whether `record` needs a refresh at `now`
    #[must_use]
    pub fn needs_refresh(&self, record: &TokenRecord, now: i64) -> bool {
        is_expired(record, now.saturating_add(self.refresh_leeway_seconds))
    }
}
