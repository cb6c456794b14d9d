//! In-memory OpenFGA fake.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::transport::proto::{
    CheckRequest, CheckResponse, ListStoresRequest, ListStoresResponse, Store, TupleKey,
    WriteRequest,
};
use crate::transport::{Connection, Connector};
use crate::types::Deadline;
use crate::Error;

const DEFAULT_PAGE_SIZE: usize = 50;

/// An in-memory stand-in for an OpenFGA server.
///
/// Implements [`Connector`], so it can be handed to
/// [`ClientRegistry::new`](crate::ClientRegistry::new) in place of the gRPC
/// connector. Checks only match direct tuples and contextual tuples; there is
/// no model evaluation.
///
/// Every clone shares the same state, which lets a test keep a handle for
/// setup and inspection after giving one to the registry.
///
/// ## Example
///
/// ```rust
/// use openfga_bridge::testing::InMemoryFga;
///
/// let fga = InMemoryFga::new();
/// fga.create_store("docs");
/// fga.write_tuple("docs", "user:anne", "reader", "document:budget");
///
/// assert_eq!(fga.connects(), 0);
/// assert_eq!(fga.tuples("docs").len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryFga {
    state: Arc<State>,
}

#[derive(Default)]
struct State {
    stores: RwLock<Vec<StoreRecord>>,
    tuples: RwLock<HashMap<String, Vec<StoredTuple>>>,
    next_id: AtomicU64,

    connects: AtomicU64,
    list_stores_calls: AtomicU64,
    check_calls: AtomicU64,
    write_calls: AtomicU64,
    open_connections: AtomicUsize,

    generation: AtomicU64,
    unreachable: AtomicBool,
    refuse_connect: AtomicBool,
    latency: RwLock<Duration>,
    page_size: RwLock<Option<usize>>,
}

struct StoreRecord {
    id: String,
    name: String,
    deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredTuple {
    user: String,
    relation: String,
    object: String,
}

impl StoredTuple {
    fn new(user: &str, relation: &str, object: &str) -> Self {
        Self {
            user: user.to_string(),
            relation: relation.to_string(),
            object: object.to_string(),
        }
    }
}

impl From<&TupleKey> for StoredTuple {
    fn from(tuple: &TupleKey) -> Self {
        Self::new(&tuple.user, &tuple.relation, &tuple.object)
    }
}

impl InMemoryFga {
    /// Creates an empty fake with no stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a live store and returns its generated id.
    ///
    /// Creating a name that already exists adds a second store with that name,
    /// as the real service allows.
    pub fn create_store(&self, name: &str) -> String {
        let id = format!("01STORE{:019}", self.state.next_id.fetch_add(1, Ordering::Relaxed));
        self.state.stores.write().push(StoreRecord {
            id: id.clone(),
            name: name.to_string(),
            deleted: false,
        });
        id
    }

    /// Soft-deletes every live store named `name`.
    ///
    /// Deleted stores are still listed, with `deleted_at` set. Returns `true`
    /// if a store was deleted.
    pub fn delete_store(&self, name: &str) -> bool {
        let mut deleted = false;
        for store in self.state.stores.write().iter_mut() {
            if store.name == name && !store.deleted {
                store.deleted = true;
                deleted = true;
            }
        }
        deleted
    }

    /// Adds a tuple directly to the first live store named `store`.
    ///
    /// Returns `false` if no such store exists.
    pub fn write_tuple(&self, store: &str, user: &str, relation: &str, object: &str) -> bool {
        let Some(id) = self.live_store_id(store) else {
            return false;
        };
        let tuple = StoredTuple::new(user, relation, object);
        let mut tuples = self.state.tuples.write();
        let entries = tuples.entry(id).or_default();
        if !entries.contains(&tuple) {
            entries.push(tuple);
        }
        true
    }

    /// Returns the tuples of the first live store named `store` as
    /// `(user, relation, object)` triples in insertion order.
    pub fn tuples(&self, store: &str) -> Vec<(String, String, String)> {
        let Some(id) = self.live_store_id(store) else {
            return Vec::new();
        };
        self.state
            .tuples
            .read()
            .get(&id)
            .map(|entries| {
                entries
                    .iter()
                    .map(|t| (t.user.clone(), t.relation.clone(), t.object.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of connections created.
    pub fn connects(&self) -> u64 {
        self.state.connects.load(Ordering::SeqCst)
    }

    /// Number of `ListStores` RPCs received (one per page).
    pub fn list_stores_calls(&self) -> u64 {
        self.state.list_stores_calls.load(Ordering::SeqCst)
    }

    /// Number of `Check` RPCs received.
    pub fn check_calls(&self) -> u64 {
        self.state.check_calls.load(Ordering::SeqCst)
    }

    /// Number of `Write` RPCs received.
    pub fn write_calls(&self) -> u64 {
        self.state.write_calls.load(Ordering::SeqCst)
    }

    /// Connections created and not yet closed.
    pub fn open_connections(&self) -> usize {
        self.state.open_connections.load(Ordering::SeqCst)
    }

    /// Breaks every existing connection.
    ///
    /// RPCs on connections created before this call fail with `UNAVAILABLE`;
    /// new connections work normally.
    pub fn break_connections(&self) {
        self.state.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Makes every RPC fail with `UNAVAILABLE` while set.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Makes [`Connector::connect`] fail while set.
    pub fn refuse_connect(&self, refuse: bool) {
        self.state.refuse_connect.store(refuse, Ordering::SeqCst);
    }

    /// Delays every RPC by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.state.latency.write() = latency;
    }

    /// Caps the `ListStores` page size regardless of the requested one.
    pub fn set_page_size(&self, page_size: usize) {
        *self.state.page_size.write() = Some(page_size.max(1));
    }

    fn live_store_id(&self, name: &str) -> Option<String> {
        self.state
            .stores
            .read()
            .iter()
            .find(|s| s.name == name && !s.deleted)
            .map(|s| s.id.clone())
    }
}

impl Connector for InMemoryFga {
    fn connect(&self, endpoint: &str) -> Result<Arc<dyn Connection>, Error> {
        if self.state.refuse_connect.load(Ordering::SeqCst) {
            return Err(Error::connection(format!("failed to create client for {endpoint}")));
        }
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        self.state.open_connections.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(InMemoryConnection {
            endpoint: endpoint.to_string(),
            generation: self.state.generation.load(Ordering::SeqCst),
            closed: AtomicBool::new(false),
            state: Arc::clone(&self.state),
        }))
    }
}

/// One connection to an [`InMemoryFga`].
struct InMemoryConnection {
    endpoint: String,
    generation: u64,
    closed: AtomicBool,
    state: Arc<State>,
}

impl InMemoryConnection {
    async fn round_trip(&self) -> Result<(), Error> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::unavailable(format!("connection to {} is closed", self.endpoint)));
        }
        let latency = *self.state.latency.read();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.state.unreachable.load(Ordering::SeqCst) {
            return Err(Error::from_status(tonic::Status::unavailable(format!(
                "{} is unreachable",
                self.endpoint
            ))));
        }
        if self.state.generation.load(Ordering::SeqCst) != self.generation {
            return Err(Error::from_status(tonic::Status::unavailable("connection reset by peer")));
        }
        Ok(())
    }

    fn live_store(&self, store_id: &str) -> Result<(), Error> {
        let stores = self.state.stores.read();
        match stores.iter().find(|s| s.id == store_id) {
            Some(store) if !store.deleted => Ok(()),
            _ => Err(Error::from_status(tonic::Status::not_found(format!(
                "store {store_id} not found"
            )))),
        }
    }
}

#[async_trait::async_trait]
impl Connection for InMemoryConnection {
    async fn list_stores(
        &self,
        request: ListStoresRequest,
        _deadline: Deadline,
    ) -> Result<ListStoresResponse, Error> {
        self.state.list_stores_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;

        let requested = request
            .page_size
            .and_then(|size| usize::try_from(size).ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let page_size = match *self.state.page_size.read() {
            Some(cap) => requested.min(cap),
            None => requested,
        };
        let offset = if request.continuation_token.is_empty() {
            0
        } else {
            request.continuation_token.parse::<usize>().map_err(|_| {
                Error::from_status(tonic::Status::invalid_argument("invalid continuation token"))
            })?
        };

        let stores = self.state.stores.read();
        let page: Vec<Store> = stores
            .iter()
            .skip(offset)
            .take(page_size)
            .map(|s| Store {
                id: s.id.clone(),
                name: s.name.clone(),
                created_at: Some(prost_types::Timestamp::default()),
                updated_at: Some(prost_types::Timestamp::default()),
                deleted_at: s.deleted.then(prost_types::Timestamp::default),
            })
            .collect();
        let next = offset + page.len();
        let continuation_token = if next < stores.len() {
            next.to_string()
        } else {
            String::new()
        };

        Ok(ListStoresResponse {
            stores: page,
            continuation_token,
        })
    }

    async fn check(&self, request: CheckRequest, _deadline: Deadline) -> Result<CheckResponse, Error> {
        self.state.check_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;
        self.live_store(&request.store_id)?;

        let Some(key) = request.tuple_key else {
            return Err(Error::from_status(tonic::Status::invalid_argument("tuple_key is required")));
        };
        let wanted = StoredTuple::new(&key.user, &key.relation, &key.object);

        let contextual = request
            .contextual_tuples
            .map(|c| c.tuple_keys)
            .unwrap_or_default();
        let allowed = contextual.iter().any(|t| StoredTuple::from(t) == wanted)
            || self
                .state
                .tuples
                .read()
                .get(&request.store_id)
                .is_some_and(|entries| entries.contains(&wanted));

        Ok(CheckResponse {
            allowed,
            resolution: String::new(),
        })
    }

    async fn write(&self, request: WriteRequest, _deadline: Deadline) -> Result<(), Error> {
        self.state.write_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;
        self.live_store(&request.store_id)?;

        let writes: Vec<StoredTuple> = request
            .writes
            .map(|w| w.tuple_keys.iter().map(StoredTuple::from).collect())
            .unwrap_or_default();
        let deletes: Vec<StoredTuple> = request
            .deletes
            .map(|d| {
                d.tuple_keys
                    .iter()
                    .map(|t| StoredTuple::new(&t.user, &t.relation, &t.object))
                    .collect()
            })
            .unwrap_or_default();

        let mut tuples = self.state.tuples.write();
        let entries = tuples.entry(request.store_id).or_default();

        // Validate the whole request before applying anything.
        for tuple in &writes {
            if entries.contains(tuple) {
                return Err(Error::from_status(tonic::Status::invalid_argument(format!(
                    "cannot write a tuple which already exists: {}#{}@{}",
                    tuple.object, tuple.relation, tuple.user
                ))));
            }
        }
        for tuple in &deletes {
            if !entries.contains(tuple) {
                return Err(Error::from_status(tonic::Status::invalid_argument(format!(
                    "cannot delete a tuple which does not exist: {}#{}@{}",
                    tuple.object, tuple.relation, tuple.user
                ))));
            }
        }

        entries.retain(|t| !deletes.contains(t));
        entries.extend(writes);
        Ok(())
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.state.open_connections.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
