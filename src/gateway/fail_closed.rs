//! Boolean boundary for hosts.

use tracing::warn;

use super::{CheckArgs, DeleteArgs, Gateway, WriteArgs};
use crate::types::{TupleKey, decode_tuple_items};
use crate::Result;

/// Boolean-only view of a [`Gateway`].
///
/// Every failure becomes `false` (denied, or not applied) and is logged at
/// `warn`. An error never turns into an allow.
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
/// let registry = ClientRegistry::new(BridgeConfig::default(), Arc::new(fga))?;
/// let boundary = Gateway::new(Arc::new(registry)).fail_closed();
///
/// // No store named "docs": resolution fails, the boundary denies.
/// assert!(!boundary.check("docs", "user:anne", "reader", "document:budget", None).await);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FailClosed {
    gateway: Gateway,
}

impl FailClosed {
    /// Wraps a gateway.
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Returns the wrapped gateway.
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// [`Gateway::check`], denying on any error.
    pub async fn check(
        &self,
        store_key: &str,
        user: &str,
        relation: &str,
        object: &str,
        contextual_tuples: Option<&str>,
    ) -> bool {
        let result = self
            .gateway
            .check(store_key, user, relation, object, contextual_tuples)
            .await;
        settle("check", result)
    }

    /// Checks against a fixed store with contextual tuples supplied as one
    /// JSON object per item.
    ///
    /// An empty `items` slice means no contextual tuples.
    pub async fn check_in_store<S: AsRef<str>>(
        &self,
        store: &str,
        user: &str,
        relation: &str,
        object: &str,
        items: &[S],
    ) -> bool {
        let result = match decode_tuple_items::<TupleKey, S>(items) {
            Ok(contextual) => {
                self.gateway
                    .check_with_tuples(store, user, relation, object, contextual)
                    .await
            },
            Err(e) => Err(e.with_store(store)),
        };
        settle("check", result)
    }

    /// [`Gateway::write_tuples`], returning whether the write was applied.
    pub async fn write_tuples(
        &self,
        store_key: &str,
        writes: Option<&str>,
        deletes: Option<&str>,
    ) -> bool {
        let result = self.gateway.write_tuples(store_key, writes, deletes).await;
        settle("write_tuples", result.map(|()| true))
    }

    /// [`Gateway::delete_tuples`], returning whether the delete was applied.
    pub async fn delete_tuples(&self, store_key: &str, deletes: Option<&str>) -> bool {
        let result = self.gateway.delete_tuples(store_key, deletes).await;
        settle("delete_tuples", result.map(|()| true))
    }

    /// Parses positional arguments and runs a check.
    pub async fn check_positional(&self, args: &[Option<&str>]) -> bool {
        let result = match CheckArgs::from_positional(args) {
            Ok(args) => self.gateway.check_args(&args).await,
            Err(e) => Err(e),
        };
        settle("check", result)
    }

    /// Parses positional arguments and runs a write.
    pub async fn write_positional(&self, args: &[Option<&str>]) -> bool {
        let result = match WriteArgs::from_positional(args) {
            Ok(args) => self.gateway.write_args(&args).await,
            Err(e) => Err(e),
        };
        settle("write_tuples", result.map(|()| true))
    }

    /// Parses positional arguments and runs a delete.
    pub async fn delete_positional(&self, args: &[Option<&str>]) -> bool {
        let result = match DeleteArgs::from_positional(args) {
            Ok(args) => self.gateway.delete_args(&args).await,
            Err(e) => Err(e),
        };
        settle("delete_tuples", result.map(|()| true))
    }
}

fn settle(operation: &str, result: Result<bool>) -> bool {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(
                operation,
                kind = %e.kind(),
                class = %e.class(),
                store = e.store().unwrap_or_default(),
                "{operation} failed: {}",
                e.message()
            );
            false
        },
    }
}
