//! Prelude module for convenient imports.
//!
//! ```rust
//! use openfga_bridge::prelude::*;
//! ```

pub use crate::{
    config::BridgeConfig,
    error::{Error, ErrorClass, ErrorKind, Result},
    gateway::{CheckArgs, DeleteArgs, FailClosed, Gateway, WriteArgs},
    registry::{ClientRegistry, RegistryStats},
    types::{ConditionlessTupleKey, StoreKey, TupleCondition, TupleKey},
};
