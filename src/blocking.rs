//! Synchronous facade for hosts without an async runtime.
//!
//! [`BlockingGateway`] owns a multi-thread tokio runtime and drives each
//! operation to completion on the calling thread. It must not be used from
//! inside another tokio runtime.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::config::BridgeConfig;
use crate::gateway::{FailClosed, Gateway};
use crate::registry::ClientRegistry;
use crate::{Error, Result};

/// Blocking wrapper around [`Gateway`].
///
/// ```rust,no_run
/// use openfga_bridge::BridgeConfig;
/// use openfga_bridge::blocking::BlockingGateway;
///
/// let gateway = BlockingGateway::grpc(BridgeConfig::from_env()?)?;
/// let allowed = gateway.check("docs", "user:anne", "reader", "document:budget", None)?;
/// # Ok::<(), openfga_bridge::Error>(())
/// ```
pub struct BlockingGateway {
    gateway: Gateway,
    runtime: Runtime,
}

impl BlockingGateway {
    /// Creates a blocking gateway over an existing registry.
    pub fn new(registry: Arc<ClientRegistry>) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .thread_name("openfga-bridge")
            .enable_all()
            .build()
            .map_err(|e| Error::configuration("failed to start the bridge runtime").with_source(e))?;
        Ok(Self {
            gateway: Gateway::new(registry),
            runtime,
        })
    }

    /// Creates a blocking gateway over a new gRPC-backed registry.
    pub fn grpc(config: BridgeConfig) -> Result<Self> {
        Self::new(Arc::new(ClientRegistry::grpc(config)?))
    }

    /// Returns the async gateway driven by this facade.
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// See [`Gateway::check`].
    pub fn check(
        &self,
        store_key: &str,
        user: &str,
        relation: &str,
        object: &str,
        contextual_tuples: Option<&str>,
    ) -> Result<bool> {
        self.runtime
            .block_on(self.gateway.check(store_key, user, relation, object, contextual_tuples))
    }

    /// See [`Gateway::write_tuples`].
    pub fn write_tuples(
        &self,
        store_key: &str,
        writes: Option<&str>,
        deletes: Option<&str>,
    ) -> Result<()> {
        self.runtime
            .block_on(self.gateway.write_tuples(store_key, writes, deletes))
    }

    /// See [`Gateway::delete_tuples`].
    pub fn delete_tuples(&self, store_key: &str, deletes: Option<&str>) -> Result<()> {
        self.runtime
            .block_on(self.gateway.delete_tuples(store_key, deletes))
    }

    /// Runs a positional check at the fail-closed boundary.
    pub fn check_positional(&self, args: &[Option<&str>]) -> bool {
        self.runtime.block_on(self.fail_closed().check_positional(args))
    }

    /// Runs a positional write at the fail-closed boundary.
    pub fn write_positional(&self, args: &[Option<&str>]) -> bool {
        self.runtime.block_on(self.fail_closed().write_positional(args))
    }

    /// Runs a positional delete at the fail-closed boundary.
    pub fn delete_positional(&self, args: &[Option<&str>]) -> bool {
        self.runtime.block_on(self.fail_closed().delete_positional(args))
    }

    fn fail_closed(&self) -> FailClosed {
        self.gateway.fail_closed()
    }
}

impl std::fmt::Debug for BlockingGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingGateway")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}
