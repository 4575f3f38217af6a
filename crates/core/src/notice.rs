//! One-time notice bookkeeping
//!
//! The public-availability announcement is shown once per installation. The
//! flag lives in the same key-value backend as the token record.

use std::sync::Arc;

use songlink_common::storage::KeyValueStore;
use tracing::warn;

const PUBLIC_AVAILABILITY_SUFFIX: &str = "notified-of-public-availability";

/// Persisted "already told the user" flags
pub struct NoticeFlags {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl NoticeFlags {
    /// Flags stored under `namespace`
    pub fn new(backend: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self { backend, key: format!("{namespace}-{PUBLIC_AVAILABILITY_SUFFIX}") }
    }

    /// Storage key of the public-availability flag
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the public-availability notice was already shown
    ///
    /// Any non-empty stored value counts as notified; unreadable storage
    /// counts as not notified.
    pub async fn has_notified(&self) -> bool {
        match self.backend.get(&self.key).await {
            Ok(Some(value)) => !value.is_empty(),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, key = %self.key, "Could not read notice flag");
                false
            }
        }
    }

    /// Record that the notice was shown; write failures are logged only
    pub async fn mark_notified(&self) {
        if let Err(e) = self.backend.set(&self.key, "true").await {
            warn!(error = %e, key = %self.key, "Could not persist notice flag");
        }
    }
}
