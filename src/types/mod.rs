//! Core types for the bridge.
//!
//! - [`TupleKey`] / [`ConditionlessTupleKey`]: relationship facts for writes,
//!   contextual tuples and deletes, with their JSON decoding helpers
//! - [`StoreKey`]: the `(endpoint, store name)` cache key
//! - [`Deadline`]: the per-call deadline shared by resolution and the RPC

mod deadline;
mod store_key;
mod tuple;

pub use deadline::Deadline;
pub use store_key::{StoreKey, normalize_endpoint};
pub use tuple::{
    ConditionlessTupleKey, Tuple, TupleCondition, TupleKey, decode_tuple_items, decode_tuple_list,
    encode_tuple_list,
};
