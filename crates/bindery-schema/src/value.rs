//! # Value Vocabulary
//!
//! The engine operates on the JSON data model: every document handed to
//! [`load`](crate::SchemaDefinition::load), every attribute map produced by
//! [`dump`](crate::SchemaDefinition::dump), is a tree of [`Value`]s. This
//! module re-exports the `serde_json` types under the names the rest of the
//! crate uses and provides the shared shape-naming helper for violation
//! messages.

pub use serde_json::Value;

/// An ordered map from field name to JSON value. This is the currency of
/// every engine operation: `load` and `validate` consume one, `load` and
/// `dump` produce one.
pub type ValueMap = serde_json::Map<String, Value>;

/// The shape name of a JSON value, as used in violation messages.
///
/// Integers are distinguished from other numbers because the engine's
/// `Integer` kind accepts only values that serialize as JSON integers.
pub fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
