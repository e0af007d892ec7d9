//! Registry Module
//!
//! Main storage engine: a sharded concurrent map of entries with lazy,
//! read-time expiration plus a bulk purge used by the background sweeper.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::storage::{Entry, Value};

/// Internal shared state for the registry
#[derive(Debug)]
struct RegistryInner {
    entries: DashMap<String, Entry>,
    ttl: Duration,
}

// == Registry ==
/// Thread-safe key-value registry with a single, process-wide TTL.
///
/// Backed by `DashMap`: operations on one key are atomic, operations on
/// different keys only contend when they hash to the same shard, and reads
/// never block other reads. Cloning is cheap and yields a handle to the same
/// storage.
///
/// Every read path applies the expiration filter itself, so an expired entry
/// is never observed even if the sweeper has not run yet.
#[derive(Debug, Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    // == Constructor ==
    /// Creates an empty registry whose entries live for `ttl` after their last write.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                entries: DashMap::new(),
                ttl,
            }),
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    // == List Keys ==
    /// Returns the keys of all live entries.
    pub fn list_keys(&self) -> BTreeSet<String> {
        let ttl = self.inner.ttl;
        self.inner
            .entries
            .iter()
            .filter(|entry| !entry.value().is_expired(ttl))
            .map(|entry| entry.key().clone())
            .collect()
    }

    // == Get ==
    /// Returns a snapshot of the live entry stored at `key`.
    pub fn get(&self, key: &str) -> Option<Entry> {
        self.with_live(key, Entry::clone)
    }

    // == Delete ==
    /// Removes `key` unconditionally.
    ///
    /// Returns whether a live entry was present before removal.
    pub fn delete(&self, key: &str) -> bool {
        let ttl = self.inner.ttl;
        self.inner
            .entries
            .remove(key)
            .map(|(_, entry)| !entry.is_expired(ttl))
            .unwrap_or(false)
    }

    // == Append ==
    /// Creates an entry if no live entry exists for `key`.
    ///
    /// An expired entry that has not been swept yet counts as absent and is replaced.
    pub fn append(&self, key: impl Into<String>, value: Value) -> Result<()> {
        let ttl = self.inner.ttl;
        match self.inner.entries.entry(key.into()) {
            MapEntry::Occupied(mut occupied) => {
                if !occupied.get().is_expired(ttl) {
                    return Err(RegistryError::AlreadyExists(occupied.key().clone()));
                }
                occupied.insert(Entry::new(value));
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry::new(value));
            }
        }
        Ok(())
    }

    // == Update ==
    /// Replaces the value of a live entry and refreshes its write time.
    pub fn update(&self, key: &str, value: Value) -> Result<()> {
        let ttl = self.inner.ttl;
        if let Some(mut entry) = self.inner.entries.get_mut(key) {
            if !entry.is_expired(ttl) {
                *entry = Entry::new(value);
                return Ok(());
            }
        }
        self.evict_expired(key);
        Err(RegistryError::NotFound(key.to_string()))
    }

    // == Get By Index ==
    /// Returns element `index` of the sequence stored at `key`.
    ///
    /// `Ok(None)` when the entry is absent or expired. Indices outside
    /// `[0, len)`, negative ones included, are an error.
    pub fn get_by_index(&self, key: &str, index: i64) -> Result<Option<Entry>> {
        self.with_live(key, |entry| match &entry.value {
            Value::Sequence(items) => usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .map(|item| entry.project(item.clone()))
                .ok_or_else(|| RegistryError::IndexOutOfRange {
                    key: key.to_string(),
                    index,
                    len: items.len(),
                }),
            Value::Scalar(_) | Value::Mapping(_) => {
                Err(RegistryError::NotASequence(key.to_string()))
            }
        })
        .transpose()
    }

    // == Get By Subkey ==
    /// Returns the element stored under `sub_key` in the mapping at `key`.
    ///
    /// `Ok(None)` both when the entry is absent or expired and when the
    /// mapping has no such sub-key.
    pub fn get_by_subkey(&self, key: &str, sub_key: &str) -> Result<Option<Entry>> {
        self.with_live(key, |entry| match &entry.value {
            Value::Mapping(map) => Ok(map.get(sub_key).map(|v| entry.project(v.clone()))),
            Value::Scalar(_) | Value::Sequence(_) => {
                Err(RegistryError::NotAMapping(key.to_string()))
            }
        })
        .transpose()
        .map(Option::flatten)
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let ttl = self.inner.ttl;
        let mut removed = 0;

        self.inner.entries.retain(|key, entry| {
            if entry.is_expired(ttl) {
                debug!(key = %key, "Expiring entry");
                removed += 1;
                false
            } else {
                true
            }
        });

        removed
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet collected.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored, expired or not.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Runs `f` against the live entry at `key` under its shard read lock.
    fn with_live<R>(&self, key: &str, f: impl FnOnce(&Entry) -> R) -> Option<R> {
        {
            let entry = self.inner.entries.get(key)?;
            if !entry.is_expired(self.inner.ttl) {
                return Some(f(entry.value()));
            }
        }
        self.evict_expired(key);
        None
    }

    /// Lazily drops an expired entry; a concurrently re-created one survives.
    fn evict_expired(&self, key: &str) {
        let ttl = self.inner.ttl;
        if self
            .inner
            .entries
            .remove_if(key, |_, entry| entry.is_expired(ttl))
            .is_some()
        {
            debug!(key = %key, "Evicted expired entry on access");
        }
    }
}
