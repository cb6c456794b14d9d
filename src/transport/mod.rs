//! Transport layer for OpenFGA communication.
//!
//! - [`Connector`] / [`Connection`]: the seam the resolver talks through
//! - [`GrpcConnector`]: plaintext tonic channels, created lazily
//! - [`proto`]: the wire-compatible subset of the `openfga.v1` messages
//!
//! The in-memory fake used by tests lives in [`crate::testing`].

pub mod proto;

mod grpc;
mod traits;

pub use grpc::{GrpcConnection, GrpcConnector};
pub use traits::{Connection, Connector};
