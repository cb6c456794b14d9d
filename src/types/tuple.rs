//! Relationship tuples and their JSON wire shape.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::transport::proto;
use crate::{Error, Result};

/// A relationship fact `(user, relation, object)`, optionally conditional.
///
/// Used for tuple writes and for contextual tuples attached to a check.
///
/// ## JSON Shape
///
/// ```json
/// {"user": "user:anne", "relation": "reader", "object": "document:budget"}
/// ```
///
/// with an optional `"condition": {"name": "...", "context": {...}}`.
///
/// ```rust
/// use openfga_bridge::TupleKey;
///
/// let tuple = TupleKey::new("user:anne", "reader", "document:budget");
/// assert_eq!(tuple.to_string(), "document:budget#reader@user:anne");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleKey {
    user: String,
    relation: String,
    object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<TupleCondition>,
}

impl TupleKey {
    /// Creates an unconditional tuple.
    pub fn new(
        user: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            relation: relation.into(),
            object: object.into(),
            condition: None,
        }
    }

    /// Attaches a relationship condition.
    #[must_use]
    pub fn with_condition(mut self, condition: TupleCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Returns the user (e.g. `user:anne`).
    #[inline]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the relation (e.g. `reader`).
    #[inline]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Returns the object (e.g. `document:budget`).
    #[inline]
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Returns the attached condition, if any.
    #[inline]
    pub fn condition(&self) -> Option<&TupleCondition> {
        self.condition.as_ref()
    }
}

impl fmt::Display for TupleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.object, self.relation, self.user)
    }
}

impl From<TupleKey> for proto::TupleKey {
    fn from(tuple: TupleKey) -> Self {
        proto::TupleKey {
            user: tuple.user,
            relation: tuple.relation,
            object: tuple.object,
            condition: tuple.condition.map(Into::into),
        }
    }
}

/// A tuple identifying a fact to delete. Deletions never carry a condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionlessTupleKey {
    user: String,
    relation: String,
    object: String,
}

impl ConditionlessTupleKey {
    /// Creates a tuple key for deletion.
    pub fn new(
        user: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }

    /// Returns the user.
    #[inline]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the relation.
    #[inline]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Returns the object.
    #[inline]
    pub fn object(&self) -> &str {
        &self.object
    }
}

impl fmt::Display for ConditionlessTupleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.object, self.relation, self.user)
    }
}

impl From<ConditionlessTupleKey> for proto::TupleKeyWithoutCondition {
    fn from(tuple: ConditionlessTupleKey) -> Self {
        proto::TupleKeyWithoutCondition {
            user: tuple.user,
            relation: tuple.relation,
            object: tuple.object,
        }
    }
}

/// A named condition attached to a written or contextual tuple.
///
/// The context is an arbitrary JSON object and is sent to the service as a
/// `google.protobuf.Struct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleCondition {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<Map<String, Value>>,
}

impl TupleCondition {
    /// Creates a condition reference without context.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: None,
        }
    }

    /// Sets the condition context.
    #[must_use]
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns the condition name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the condition context.
    pub fn context(&self) -> Option<&Map<String, Value>> {
        self.context.as_ref()
    }
}

impl From<TupleCondition> for proto::RelationshipCondition {
    fn from(condition: TupleCondition) -> Self {
        proto::RelationshipCondition {
            name: condition.name,
            context: condition.context.map(json_to_struct),
        }
    }
}

fn json_to_struct(map: Map<String, Value>) -> prost_types::Struct {
    prost_types::Struct {
        fields: map
            .into_iter()
            .map(|(key, value)| (key, json_to_value(value)))
            .collect(),
    }
}

fn json_to_value(value: Value) -> prost_types::Value {
    use prost_types::value::Kind;

    let kind = match value {
        Value::Null => Kind::NullValue(prost_types::NullValue::NullValue as i32),
        Value::Bool(b) => Kind::BoolValue(b),
        // Struct numbers are doubles on the wire.
        Value::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or_default()),
        Value::String(s) => Kind::StringValue(s),
        Value::Array(items) => Kind::ListValue(prost_types::ListValue {
            values: items.into_iter().map(json_to_value).collect(),
        }),
        Value::Object(map) => Kind::StructValue(json_to_struct(map)),
    };
    prost_types::Value { kind: Some(kind) }
}

/// Common view over the tuple shapes accepted at the boundary.
pub trait Tuple: Serialize + DeserializeOwned {
    /// Returns `(user, relation, object)`.
    fn parts(&self) -> (&str, &str, &str);
}

impl Tuple for TupleKey {
    fn parts(&self) -> (&str, &str, &str) {
        (&self.user, &self.relation, &self.object)
    }
}

impl Tuple for ConditionlessTupleKey {
    fn parts(&self) -> (&str, &str, &str) {
        (&self.user, &self.relation, &self.object)
    }
}

/// Decodes a JSON array of tuples.
///
/// `None`, a blank string and `null` all decode to an empty list. Every entry
/// must carry non-empty `user`, `relation` and `object` strings.
///
/// ```rust
/// use openfga_bridge::{decode_tuple_list, TupleKey};
///
/// let tuples: Vec<TupleKey> = decode_tuple_list(Some(
///     r#"[{"user":"user:bob","relation":"reader","object":"document:budget"}]"#,
/// ))
/// .unwrap();
/// assert_eq!(tuples[0].user(), "user:bob");
///
/// let none: Vec<TupleKey> = decode_tuple_list(None).unwrap();
/// assert!(none.is_empty());
/// ```
pub fn decode_tuple_list<T: Tuple>(payload: Option<&str>) -> Result<Vec<T>> {
    let payload = match payload.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(payload) => payload,
    };

    let tuples: Option<Vec<T>> = serde_json::from_str(payload)?;
    let tuples = tuples.unwrap_or_default();
    for (index, tuple) in tuples.iter().enumerate() {
        validate(index, tuple)?;
    }
    Ok(tuples)
}

/// Decodes tuples supplied as individual JSON objects, one per item.
///
/// This is the shape produced by hosts that pass contextual tuples as an array
/// of JSON strings rather than one JSON array.
pub fn decode_tuple_items<T, S>(items: &[S]) -> Result<Vec<T>>
where
    T: Tuple,
    S: AsRef<str>,
{
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let tuple: T = serde_json::from_str(item.as_ref()).map_err(|e| {
                Error::decoding(format!("malformed tuple at index {index}: {e}")).with_source(e)
            })?;
            validate(index, &tuple)?;
            Ok(tuple)
        })
        .collect()
}

/// Encodes tuples into the JSON array shape accepted by [`decode_tuple_list`].
pub fn encode_tuple_list<T: Tuple>(tuples: &[T]) -> Result<String> {
    serde_json::to_string(tuples)
        .map_err(|e| Error::decoding(format!("failed to encode tuple list: {e}")).with_source(e))
}

fn validate<T: Tuple>(index: usize, tuple: &T) -> Result<()> {
    let (user, relation, object) = tuple.parts();
    for (field, value) in [("user", user), ("relation", relation), ("object", object)] {
        if value.is_empty() {
            return Err(Error::decoding(format!("tuple at index {index} has an empty '{field}'")));
        }
    }
    Ok(())
}
