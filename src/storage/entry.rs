//! Registry Entry Module
//!
//! Defines a stored value together with the time of its last write.

use std::time::{Duration, Instant};

use crate::storage::Value;

// == Entry ==
/// A stored value and the instant it was last written.
///
/// Entries handed out by the registry are snapshots; mutating one has no
/// effect on what is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The stored value
    pub value: Value,
    /// Last write time (creation or most recent update)
    pub last_write: Instant,
}

impl Entry {
    // == Constructor ==
    /// Creates a freshly written entry.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            last_write: Instant::now(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is already expired.
    #[inline]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.last_write.elapsed() >= ttl
    }

    // == Expires In ==
    /// Remaining lifetime under `ttl`, zero once expired.
    pub fn expires_in(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.last_write.elapsed())
    }

    // == Project ==
    /// Wraps a nested element, inheriting this entry's write time.
    pub(crate) fn project(&self, value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            last_write: self.last_write,
        }
    }
}
