//! Testing utilities for code built on the bridge.
//!
//! - [`InMemoryFga`]: an in-memory OpenFGA fake that plugs into
//!   [`ClientRegistry`](crate::ClientRegistry) as a
//!   [`Connector`](crate::transport::Connector)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use openfga_bridge::testing::InMemoryFga;
//! use openfga_bridge::{BridgeConfig, ClientRegistry, Gateway};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> openfga_bridge::Result<()> {
//! let fga = InMemoryFga::new();
//! fga.create_store("docs");
//! fga.write_tuple("docs", "user:anne", "reader", "document:budget");
//!
//! let registry = ClientRegistry::new(BridgeConfig::default(), Arc::new(fga.clone()))?;
//! let gateway = Gateway::new(Arc::new(registry));
//!
//! assert!(gateway.check("docs", "user:anne", "reader", "document:budget", None).await?);
//! assert_eq!(fga.list_stores_calls(), 1);
//! # Ok(())
//! # }
//! ```

mod in_memory;

pub use in_memory::InMemoryFga;
