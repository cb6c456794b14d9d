//! Store-key to client resolution.
//!
//! [`ClientRegistry`] owns the cache of live connections. A miss connects to
//! the key's endpoint, lists stores until it finds a live store with the
//! requested name and publishes the result. Failures never leave a partial
//! entry behind, and every connection that does not end up cached is closed.

mod entry;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

pub use entry::{CachedClient, RegistryStats};
use entry::Counters;

use crate::config::BridgeConfig;
use crate::transport::proto::ListStoresRequest;
use crate::transport::{Connection, Connector, GrpcConnector};
use crate::types::{Deadline, StoreKey, normalize_endpoint};
use crate::{Error, Result};

type Flight = Arc<tokio::sync::Mutex<()>>;

/// Cache of resolved clients keyed by [`StoreKey`].
///
/// ## Concurrency
///
/// The map lock is only held for lookups and inserts, never across a network
/// call. Misses are single-flight per key: concurrent callers for the same
/// key wait for one resolution, while misses on different keys proceed in
/// parallel.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use openfga_bridge::testing::InMemoryFga;
/// use openfga_bridge::{BridgeConfig, ClientRegistry, Deadline};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> openfga_bridge::Result<()> {
/// let fga = InMemoryFga::new();
/// let id = fga.create_store("docs");
///
/// let registry = ClientRegistry::new(BridgeConfig::default(), Arc::new(fga.clone()))?;
/// let key = registry.key_for("docs")?;
///
/// let client = registry.resolve(&key, Deadline::after(Duration::from_secs(5))).await?;
/// assert_eq!(client.store_id(), id);
/// assert!(registry.contains(&key));
/// # Ok(())
/// # }
/// ```
pub struct ClientRegistry {
    config: BridgeConfig,
    default_endpoint: String,
    connector: Arc<dyn Connector>,
    entries: Mutex<HashMap<StoreKey, Arc<CachedClient>>>,
    resolving: Mutex<HashMap<StoreKey, Flight>>,
    counters: Counters,
}

impl ClientRegistry {
    /// Creates a registry that connects through `connector`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: BridgeConfig, connector: Arc<dyn Connector>) -> Result<Self> {
        config.validate()?;
        let default_endpoint = normalize_endpoint(&config.server_address)?;
        Ok(Self {
            config,
            default_endpoint,
            connector,
            entries: Mutex::new(HashMap::new()),
            resolving: Mutex::new(HashMap::new()),
            counters: Counters::default(),
        })
    }

    /// Creates a registry that opens plaintext gRPC channels.
    pub fn grpc(config: BridgeConfig) -> Result<Self> {
        let connector = GrpcConnector::new(config.connect_timeout);
        Self::new(config, Arc::new(connector))
    }

    /// Returns the configuration the registry was built with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the normalized endpoint used for keys that name only a store.
    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }

    /// Parses a raw store key (`"store"` or `"http://<host:port>/<store>"`).
    pub fn key_for(&self, raw: &str) -> Result<StoreKey> {
        StoreKey::parse(raw, &self.default_endpoint)
    }

    /// Returns the client for `key`, resolving it on a miss.
    ///
    /// A hit performs no I/O. Every step of a miss, including waiting for
    /// another caller's in-flight resolution, is bounded by `deadline`.
    ///
    /// # Errors
    ///
    /// Resolution-class errors: the connection could not be built, listing
    /// stores failed or timed out, or no live store has the requested name.
    /// Nothing is cached on error.
    pub async fn resolve(&self, key: &StoreKey, deadline: Deadline) -> Result<Arc<CachedClient>> {
        if let Some(entry) = self.cached(key) {
            Counters::bump(&self.counters.hits);
            debug!(store = %key, "client cache hit");
            return Ok(entry);
        }
        Counters::bump(&self.counters.misses);

        let flight = FlightGuard::join(self, key);
        let _turn = deadline
            .wait("waiting for store resolution", flight.lock())
            .await
            .map_err(|e| e.in_resolution().with_store(key.to_string()))?;

        // Another caller may have finished while we waited.
        if let Some(entry) = self.cached(key) {
            debug!(store = %key, "client resolved by concurrent caller");
            return Ok(entry);
        }

        self.resolve_uncached(key, deadline).await.inspect_err(|e| {
            Counters::bump(&self.counters.failed_resolutions);
            warn!(store = %key, error = %e, "store resolution failed");
        })
    }

    async fn resolve_uncached(&self, key: &StoreKey, deadline: Deadline) -> Result<Arc<CachedClient>> {
        Counters::bump(&self.counters.resolutions);
        debug!(store = %key, endpoint = key.endpoint(), "creating connection");

        let connection = self
            .connector
            .connect(key.endpoint())
            .map_err(|e| e.in_resolution().with_store(key.to_string()))?;
        let pending = PendingConnection::new(connection);

        let store_id = self
            .find_store(pending.connection(), key, deadline)
            .await
            .map_err(|e| e.in_resolution().with_store(key.to_string()))?;

        let entry = Arc::new(CachedClient::new(key.clone(), pending.publish(), store_id));
        let existing = {
            let mut entries = self.entries.lock();
            match entries.get(key) {
                Some(existing) => Some(Arc::clone(existing)),
                None => {
                    entries.insert(key.clone(), Arc::clone(&entry));
                    None
                },
            }
        };

        if let Some(existing) = existing {
            // The published entry wins; this connection is surplus.
            entry.close();
            debug!(store = %key, "discarded duplicate connection");
            return Ok(existing);
        }

        info!(store = %key, store_id = entry.store_id(), "resolved store");
        Ok(entry)
    }

    async fn find_store(
        &self,
        connection: &dyn Connection,
        key: &StoreKey,
        deadline: Deadline,
    ) -> Result<String> {
        let mut continuation_token = String::new();
        loop {
            let request = ListStoresRequest {
                page_size: Some(self.config.list_stores_page_size),
                continuation_token,
            };
            let page = deadline
                .run("list stores", connection.list_stores(request, deadline))
                .await?;

            if let Some(store) = page
                .stores
                .into_iter()
                .find(|s| s.name == key.store_name() && s.deleted_at.is_none())
            {
                return Ok(store.id);
            }
            if page.continuation_token.is_empty() {
                return Err(Error::store_not_found(key.store_name()));
            }
            continuation_token = page.continuation_token;
        }
    }

    /// Returns the cached entry for `key` without resolving.
    pub fn cached(&self, key: &StoreKey) -> Option<Arc<CachedClient>> {
        self.entries.lock().get(key).cloned()
    }

    /// Returns `true` if `key` is cached.
    pub fn contains(&self, key: &StoreKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes `key` and closes its connection.
    ///
    /// Returns `false` if the key was not cached.
    pub fn evict(&self, key: &StoreKey) -> bool {
        let removed = self.entries.lock().remove(key);
        match removed {
            Some(entry) => {
                entry.close();
                Counters::bump(&self.counters.evictions);
                info!(store = %key, "evicted client");
                true
            },
            None => false,
        }
    }

    /// Evicts `entry` only if it is still the cached entry for its key.
    ///
    /// The entry's connection is closed either way. A failure observed on an
    /// old entry therefore never removes a replacement resolved since.
    pub fn evict_entry(&self, entry: &Arc<CachedClient>) -> bool {
        let removed = {
            let mut entries = self.entries.lock();
            match entries.get(entry.key()) {
                Some(current) if Arc::ptr_eq(current, entry) => entries.remove(entry.key()).is_some(),
                _ => false,
            }
        };
        entry.close();
        if removed {
            Counters::bump(&self.counters.evictions);
            info!(store = %entry.key(), "evicted client");
        }
        removed
    }

    /// Evicts every entry and closes all cached connections.
    pub fn clear(&self) {
        let drained: Vec<_> = self.entries.lock().drain().map(|(_, entry)| entry).collect();
        for entry in &drained {
            entry.close();
        }
        if !drained.is_empty() {
            info!(count = drained.len(), "closed all cached clients");
        }
    }

    /// Returns a snapshot of the registry counters.
    pub fn stats(&self) -> RegistryStats {
        self.counters.snapshot(self.len())
    }
}

impl Drop for ClientRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("default_endpoint", &self.default_endpoint)
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}

/// Membership in the single-flight group for one key.
///
/// Dropping the guard leaves the group; the last member removes the group's
/// lock from the registry, including when the caller is cancelled.
struct FlightGuard<'a> {
    registry: &'a ClientRegistry,
    key: StoreKey,
    flight: Flight,
}

impl<'a> FlightGuard<'a> {
    fn join(registry: &'a ClientRegistry, key: &StoreKey) -> Self {
        let flight = Arc::clone(registry.resolving.lock().entry(key.clone()).or_default());
        Self {
            registry,
            key: key.clone(),
            flight,
        }
    }

    fn lock(&self) -> impl Future<Output = tokio::sync::MutexGuard<'_, ()>> {
        self.flight.lock()
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut resolving = self.registry.resolving.lock();
        // Members only join under this lock, so the count cannot grow here.
        if let Some(current) = resolving.get(&self.key)
            && Arc::ptr_eq(current, &self.flight)
            && Arc::strong_count(&self.flight) == 2
        {
            resolving.remove(&self.key);
        }
    }
}

/// A connection not yet published to the cache; closed if dropped.
struct PendingConnection {
    connection: Arc<dyn Connection>,
    armed: bool,
}

impl PendingConnection {
    fn new(connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            armed: true,
        }
    }

    fn connection(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    fn publish(mut self) -> Arc<dyn Connection> {
        self.armed = false;
        Arc::clone(&self.connection)
    }
}

impl Drop for PendingConnection {
    fn drop(&mut self) {
        if self.armed {
            self.connection.close();
        }
    }
}
