//! Positional argument parsing for host-invoked operations.
//!
//! Hosts call the bridge with a flat list of nullable string values. These
//! types check the arity, reject NULL where a value is required and hand the
//! gateway owned, named fields.

use crate::{Error, Result};

/// Arguments of a check: `(store, user, relation, object, [contextual tuples])`.
///
/// ```rust
/// use openfga_bridge::gateway::CheckArgs;
///
/// let args = CheckArgs::from_positional(&[
///     Some("docs"),
///     Some("user:anne"),
///     Some("reader"),
///     Some("document:budget"),
/// ])
/// .unwrap();
/// assert_eq!(args.store_key, "docs");
/// assert!(args.contextual_tuples.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    /// Raw store key.
    pub store_key: String,
    /// User being checked (e.g. `user:anne`).
    pub user: String,
    /// Relation being checked.
    pub relation: String,
    /// Object being checked.
    pub object: String,
    /// JSON array of contextual tuples.
    pub contextual_tuples: Option<String>,
}

impl CheckArgs {
    /// Parses 4 or 5 positional values.
    pub fn from_positional(args: &[Option<&str>]) -> Result<Self> {
        arity("check", args, 4, 5)?;
        Ok(Self {
            store_key: required("check", args, 0, "store")?,
            user: required("check", args, 1, "user")?,
            relation: required("check", args, 2, "relation")?,
            object: required("check", args, 3, "object")?,
            contextual_tuples: optional(args, 4),
        })
    }
}

/// Arguments of a write: `(store, writes, [deletes])`.
///
/// Both tuple payloads may be NULL, meaning an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteArgs {
    /// Raw store key.
    pub store_key: String,
    /// JSON array of tuples to write.
    pub writes: Option<String>,
    /// JSON array of tuples to delete.
    pub deletes: Option<String>,
}

impl WriteArgs {
    /// Parses 2 or 3 positional values.
    pub fn from_positional(args: &[Option<&str>]) -> Result<Self> {
        arity("write_tuples", args, 2, 3)?;
        Ok(Self {
            store_key: required("write_tuples", args, 0, "store")?,
            writes: optional(args, 1),
            deletes: optional(args, 2),
        })
    }
}

/// Arguments of a delete: `(store, deletes)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteArgs {
    /// Raw store key.
    pub store_key: String,
    /// JSON array of tuples to delete.
    pub deletes: Option<String>,
}

impl DeleteArgs {
    /// Parses exactly 2 positional values.
    pub fn from_positional(args: &[Option<&str>]) -> Result<Self> {
        arity("delete_tuples", args, 2, 2)?;
        Ok(Self {
            store_key: required("delete_tuples", args, 0, "store")?,
            deletes: optional(args, 1),
        })
    }
}

fn arity(operation: &str, args: &[Option<&str>], min: usize, max: usize) -> Result<()> {
    if (min..=max).contains(&args.len()) {
        return Ok(());
    }
    let expected = if min == max {
        min.to_string()
    } else {
        format!("{min} or {max}")
    };
    Err(Error::invalid_argument(format!(
        "{operation} called with invalid number of arguments: expected {expected}, got {}",
        args.len()
    )))
}

fn required(operation: &str, args: &[Option<&str>], index: usize, name: &str) -> Result<String> {
    match args.get(index).copied().flatten() {
        Some(value) => Ok(value.to_string()),
        None => Err(Error::invalid_argument(format!(
            "{operation}: argument {} ({name}) must not be null",
            index + 1
        ))),
    }
}

fn optional(args: &[Option<&str>], index: usize) -> Option<String> {
    args.get(index).copied().flatten().map(str::to_string)
}
