//! Permission checks and tuple writes against resolved stores.
//!
//! Every [`Gateway`] operation follows the same pipeline:
//!
//! 1. decode and validate arguments (no I/O)
//! 2. resolve the client for the store key
//! 3. build the protocol request
//! 4. invoke it under the call deadline
//! 5. on RPC failure, evict the entry that served the call
//!
//! [`FailClosed`] wraps the gateway for hosts that only understand booleans.

mod args;
mod fail_closed;

use std::future::Future;
use std::sync::Arc;

use tracing::{instrument, warn};

pub use args::{CheckArgs, DeleteArgs, WriteArgs};
pub use fail_closed::FailClosed;

use crate::config::BridgeConfig;
use crate::registry::{CachedClient, ClientRegistry};
use crate::transport::proto::{
    CheckRequest, CheckRequestTupleKey, ContextualTupleKeys, WriteRequest, WriteRequestDeletes,
    WriteRequestWrites,
};
use crate::types::{ConditionlessTupleKey, Deadline, TupleKey, decode_tuple_list};
use crate::{Error, Result};

/// Authorization operations against stores resolved through a
/// [`ClientRegistry`].
///
/// Cheap to clone; clones share the registry.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use openfga_bridge::testing::InMemoryFga;
/// use openfga_bridge::{BridgeConfig, ClientRegistry, Gateway};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> openfga_bridge::Result<()> {
/// let fga = InMemoryFga::new();
/// fga.create_store("docs");
///
/// let registry = ClientRegistry::new(BridgeConfig::default(), Arc::new(fga.clone()))?;
/// let gateway = Gateway::new(Arc::new(registry));
///
/// gateway
///     .write_tuples(
///         "docs",
///         Some(r#"[{"user":"user:bob","relation":"reader","object":"document:budget"}]"#),
///         None,
///     )
///     .await?;
/// assert!(gateway.check("docs", "user:bob", "reader", "document:budget", None).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Gateway {
    registry: Arc<ClientRegistry>,
}

impl Gateway {
    /// Creates a gateway over a shared registry.
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Creates a gateway over a new gRPC-backed registry.
    pub fn grpc(config: BridgeConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(ClientRegistry::grpc(config)?)))
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Returns a boolean-only view of this gateway.
    pub fn fail_closed(&self) -> FailClosed {
        FailClosed::new(self.clone())
    }

    /// Checks whether `user` has `relation` on `object`.
    ///
    /// `contextual_tuples` is an optional JSON array of tuples considered for
    /// this check only. It is decoded before any network I/O.
    ///
    /// # Errors
    ///
    /// Decoding errors for a malformed payload, resolution errors when the
    /// store cannot be resolved, transport errors when the RPC fails (the
    /// cached client is evicted).
    #[instrument(skip(self, contextual_tuples))]
    pub async fn check(
        &self,
        store_key: &str,
        user: &str,
        relation: &str,
        object: &str,
        contextual_tuples: Option<&str>,
    ) -> Result<bool> {
        let contextual = decode_tuple_list::<TupleKey>(contextual_tuples)
            .map_err(|e| e.with_store(store_key))?;
        self.check_with_tuples(store_key, user, relation, object, contextual)
            .await
    }

    /// Checks with already-decoded contextual tuples.
    #[instrument(skip(self, contextual))]
    pub async fn check_with_tuples(
        &self,
        store_key: &str,
        user: &str,
        relation: &str,
        object: &str,
        contextual: Vec<TupleKey>,
    ) -> Result<bool> {
        for (name, value) in [("user", user), ("relation", relation), ("object", object)] {
            if value.is_empty() {
                return Err(
                    Error::invalid_argument(format!("check: {name} cannot be empty")).with_store(store_key)
                );
            }
        }
        let key = self.registry.key_for(store_key)?;
        let deadline = Deadline::after(self.registry.config().request_timeout);
        let client = self.registry.resolve(&key, deadline).await?;

        let request = CheckRequest {
            store_id: client.store_id().to_string(),
            tuple_key: Some(CheckRequestTupleKey {
                user: user.to_string(),
                relation: relation.to_string(),
                object: object.to_string(),
            }),
            contextual_tuples: (!contextual.is_empty()).then(|| ContextualTupleKeys {
                tuple_keys: contextual.into_iter().map(Into::into).collect(),
            }),
            ..Default::default()
        };

        let response = self
            .invoke(&client, "check", deadline, client.connection().check(request, deadline))
            .await?;
        Ok(response.allowed)
    }

    /// Atomically writes and deletes tuples.
    ///
    /// Either payload may be `None` or blank. Both payloads are decoded before
    /// any I/O; if either is malformed the error names every failing payload.
    /// When both are empty the call succeeds without contacting the service.
    #[instrument(skip(self, writes, deletes))]
    pub async fn write_tuples(
        &self,
        store_key: &str,
        writes: Option<&str>,
        deletes: Option<&str>,
    ) -> Result<()> {
        let (writes, deletes) = match (
            decode_tuple_list::<TupleKey>(writes),
            decode_tuple_list::<ConditionlessTupleKey>(deletes),
        ) {
            (Ok(writes), Ok(deletes)) => (writes, deletes),
            (writes, deletes) => {
                let failures: Vec<String> = [("writes", writes.err()), ("deletes", deletes.err())]
                    .into_iter()
                    .filter_map(|(payload, err)| err.map(|e| format!("{payload}: {}", e.message())))
                    .collect();
                return Err(Error::decoding(format!(
                    "invalid tuple payload ({})",
                    failures.join("; ")
                ))
                .with_store(store_key));
            },
        };
        self.write_with_tuples(store_key, writes, deletes).await
    }

    /// Deletes tuples. Equivalent to [`write_tuples`](Self::write_tuples)
    /// with no writes.
    pub async fn delete_tuples(&self, store_key: &str, deletes: Option<&str>) -> Result<()> {
        self.write_tuples(store_key, None, deletes).await
    }

    /// Writes and deletes already-decoded tuples in one request.
    #[instrument(skip(self, writes, deletes))]
    pub async fn write_with_tuples(
        &self,
        store_key: &str,
        writes: Vec<TupleKey>,
        deletes: Vec<ConditionlessTupleKey>,
    ) -> Result<()> {
        let key = self.registry.key_for(store_key)?;
        if writes.is_empty() && deletes.is_empty() {
            return Ok(());
        }

        let deadline = Deadline::after(self.registry.config().request_timeout);
        let client = self.registry.resolve(&key, deadline).await?;

        let request = WriteRequest {
            store_id: client.store_id().to_string(),
            writes: (!writes.is_empty()).then(|| WriteRequestWrites {
                tuple_keys: writes.into_iter().map(Into::into).collect(),
            }),
            deletes: (!deletes.is_empty()).then(|| WriteRequestDeletes {
                tuple_keys: deletes.into_iter().map(Into::into).collect(),
            }),
            ..Default::default()
        };

        self.invoke(&client, "write", deadline, client.connection().write(request, deadline))
            .await
    }

    /// Runs [`check`](Self::check) with positional arguments.
    pub async fn check_args(&self, args: &CheckArgs) -> Result<bool> {
        self.check(
            &args.store_key,
            &args.user,
            &args.relation,
            &args.object,
            args.contextual_tuples.as_deref(),
        )
        .await
    }

    /// Runs [`write_tuples`](Self::write_tuples) with positional arguments.
    pub async fn write_args(&self, args: &WriteArgs) -> Result<()> {
        self.write_tuples(&args.store_key, args.writes.as_deref(), args.deletes.as_deref())
            .await
    }

    /// Runs [`delete_tuples`](Self::delete_tuples) with positional arguments.
    pub async fn delete_args(&self, args: &DeleteArgs) -> Result<()> {
        self.delete_tuples(&args.store_key, args.deletes.as_deref())
            .await
    }

    async fn invoke<T, F>(
        &self,
        client: &Arc<CachedClient>,
        operation: &'static str,
        deadline: Deadline,
        call: F,
    ) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        deadline.run(operation, call).await.map_err(|e| {
            let e = e.with_store(client.key().to_string());
            if e.evicts_client() {
                self.registry.evict_entry(client);
                warn!(store = %client.key(), operation, error = %e, "rpc failed, client evicted");
            }
            e
        })
    }
}
