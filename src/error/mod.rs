//! Error types for the bridge.
//!
//! Every operation returns [`Error`]. Its [`ErrorClass`] records the pipeline
//! stage that failed, which decides how the failure is handled:
//!
//! - `Argument` / `Decoding`: bad input, nothing touched
//! - `Resolution`: no client could be resolved, nothing cached
//! - `Transport`: an RPC against a cached client failed, the client is evicted
//!
//! ## Key Invariant
//!
//! `check()` returns `Ok(false)` for a denied permission, not `Err`. An `Err`
//! means the service could not answer; callers at the embedding boundary must
//! treat it as deny (see [`FailClosed`](crate::gateway::FailClosed)).

#[allow(clippy::module_inception)]
mod error;
mod kind;

pub use error::Error;
pub use kind::{ErrorClass, ErrorKind};

/// A specialized `Result` type for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;
