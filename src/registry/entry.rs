//! Cached client entries and registry statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::transport::Connection;
use crate::types::StoreKey;

/// One live binding to an endpoint for a specific store.
///
/// Entries are immutable once published; a stale entry is evicted and
/// replaced, never edited.
pub struct CachedClient {
    key: StoreKey,
    connection: Arc<dyn Connection>,
    store_id: String,
}

impl CachedClient {
    pub(crate) fn new(key: StoreKey, connection: Arc<dyn Connection>, store_id: String) -> Self {
        Self {
            key,
            connection,
            store_id,
        }
    }

    /// Returns the key this entry is cached under.
    #[inline]
    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    /// Returns the store id resolved from the store name.
    #[inline]
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// Returns the connection carrying RPCs for this store.
    #[inline]
    pub fn connection(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    pub(crate) fn close(&self) {
        self.connection.close();
    }
}

impl fmt::Debug for CachedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedClient")
            .field("key", &self.key)
            .field("store_id", &self.store_id)
            .field("closed", &self.connection.is_closed())
            .finish()
    }
}

/// Snapshot of registry counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Lookups served from the cache without I/O.
    pub hits: u64,
    /// Lookups that missed the cache on the first check.
    pub misses: u64,
    /// Resolutions that connected and listed stores.
    pub resolutions: u64,
    /// Resolutions that ended in an error.
    pub failed_resolutions: u64,
    /// Entries removed because of failures or explicit eviction.
    pub evictions: u64,
    /// Entries currently cached.
    pub cached: usize,
}

impl RegistryStats {
    /// Returns the fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) hits: AtomicU64,
    pub(crate) misses: AtomicU64,
    pub(crate) resolutions: AtomicU64,
    pub(crate) failed_resolutions: AtomicU64,
    pub(crate) evictions: AtomicU64,
}

impl Counters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, cached: usize) -> RegistryStats {
        RegistryStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            failed_resolutions: self.failed_resolutions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            cached,
        }
    }
}
