//! # OpenFGA Bridge
//!
//! Resolves logical store names to live OpenFGA connections and runs
//! permission checks and tuple writes against them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openfga_bridge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let gateway = Gateway::grpc(BridgeConfig::from_env()?)?;
//!
//!     let allowed = gateway
//!         .check("docs", "user:anne", "reader", "document:budget", None)
//!         .await?;
//!     println!("Allowed: {}", allowed);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Store keys**: `"docs"` targets the configured default endpoint,
//!   `"http://fga.internal:8081/docs"` names its own
//! - **Resolution**: the first call for a key connects, lists stores and caches
//!   the live store with that name; later calls reuse the cached client
//! - **Eviction**: a failed RPC drops the client that served it; the next call
//!   resolves again
//! - **Fail closed**: [`FailClosed`] turns every error into `false`
//!
//! ## Features
//!
//! - `blocking`: [`blocking::BlockingGateway`], a synchronous facade owning its
//!   own runtime

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod error;
pub mod gateway;
pub mod registry;
pub mod types;

// Transport layer
pub mod transport;

// Blocking facade
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub mod blocking;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use config::BridgeConfig;
pub use error::{Error, ErrorClass, ErrorKind, Result};
pub use gateway::{FailClosed, Gateway};
pub use registry::{CachedClient, ClientRegistry, RegistryStats};
pub use types::{
    ConditionlessTupleKey, Deadline, StoreKey, TupleCondition, TupleKey, decode_tuple_items,
    decode_tuple_list, encode_tuple_list,
};
