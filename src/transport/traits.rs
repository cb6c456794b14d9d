//! Transport trait definitions.
//!
//! The resolver only ever talks to the authorization service through these two
//! traits, so the gRPC implementation and the in-memory fake used in tests are
//! interchangeable.

use std::sync::Arc;

use super::proto::{
    CheckRequest, CheckResponse, ListStoresRequest, ListStoresResponse, WriteRequest,
};
use crate::types::Deadline;
use crate::Error;

/// Creates connections to an authorization-service endpoint.
///
/// `connect` must not wait for the remote peer: it only builds the transport
/// object. Reachability is established by the first RPC.
pub trait Connector: Send + Sync {
    /// Creates a connection to `endpoint` (a normalized URI such as
    /// `http://openfga:8081`).
    fn connect(&self, endpoint: &str) -> Result<Arc<dyn Connection>, Error>;
}

/// A live connection to the authorization service with its RPC stub.
///
/// Every RPC receives the call deadline so implementations can propagate it
/// on the wire; callers enforce it locally as well.
#[async_trait::async_trait]
pub trait Connection: Send + Sync {
    /// Lists one page of stores. No server-side filtering is applied.
    async fn list_stores(
        &self,
        request: ListStoresRequest,
        deadline: Deadline,
    ) -> Result<ListStoresResponse, Error>;

    /// Evaluates a permission check.
    async fn check(&self, request: CheckRequest, deadline: Deadline) -> Result<CheckResponse, Error>;

    /// Atomically applies tuple writes and deletes.
    async fn write(&self, request: WriteRequest, deadline: Deadline) -> Result<(), Error>;

    /// Releases the underlying transport resources.
    ///
    /// Idempotent. RPCs issued after `close` fail with an unavailable error.
    fn close(&self);

    /// Returns `true` once [`close`](Connection::close) has been called.
    fn is_closed(&self) -> bool;

    /// Returns the endpoint this connection targets.
    fn endpoint(&self) -> &str;
}
