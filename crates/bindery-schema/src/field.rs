//! # Field Descriptor Set
//!
//! A schema is an ordered set of [`FieldDescriptor`]s. Each descriptor names
//! a field, declares the shape its values must take ([`FieldKind`]), whether
//! the field must be present on load ([`FieldDescriptor::required`]), an
//! optional default injected when the field is absent from a loaded
//! document, and zero or more value [`FieldRule`]s.
//!
//! Descriptors are plain data. The checks they declare are carried out by
//! the engine in [`schema`](crate::schema), which owns path accumulation
//! and recursion into nested and polymorphic fields.

use std::sync::Arc;

use regex_lite::Regex;

use crate::choice::PolymorphicChoice;
use crate::schema::SchemaDefinition;
use crate::value::{type_label, Value};

/// The shape a field's values must take.
///
/// Scalar kinds accept exactly the matching JSON shape; no coercion is
/// performed in either direction. `Integer` accepts only values that
/// serialize as JSON integers; `1.0` is a `Number`, never an `Integer`.
/// `null` is a value like any other and satisfies only [`FieldKind::Any`].
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Any JSON value, including `null`. Never produces a shape violation.
    Any,
    /// A JSON boolean.
    Boolean,
    /// A JSON integer (`i64` or `u64` representable).
    Integer,
    /// Any JSON number, integer or floating point.
    Number,
    /// A JSON string.
    String,
    /// A string holding an ISO 8601 calendar date (`YYYY-MM-DD`).
    Date,
    /// A string holding an RFC 3339 datetime.
    DateTime,
    /// A JSON array whose every element conforms to the inner kind.
    List(Box<FieldKind>),
    /// A free-form JSON object. Member values are not checked.
    Map,
    /// A JSON object conforming to another schema, checked recursively.
    Nested(Arc<SchemaDefinition>),
    /// One of several schemas, selected per value by a tag hint.
    Choice(PolymorphicChoice),
}

impl FieldKind {
    /// The shape name used in mismatch messages ("expected {shape}, got ...").
    pub(crate) fn expected_shape(&self) -> &'static str {
        match self {
            Self::Any => "any value",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Date => "date string",
            Self::DateTime => "datetime string",
            Self::List(_) => "array",
            Self::Map | Self::Nested(_) | Self::Choice(_) => "object",
        }
    }
}

/// A value constraint attached to a field, checked on load and validate.
///
/// Rules never run on dump, which guards only the declared shape, and
/// never run against injected defaults.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// The value must be numeric and fall within the inclusive bounds.
    Range {
        /// Inclusive lower bound, if any.
        min: Option<f64>,
        /// Inclusive upper bound, if any.
        max: Option<f64>,
    },
    /// The value's length must fall within the inclusive bounds. Strings
    /// are measured in Unicode scalar values, arrays and objects in
    /// elements.
    Length {
        /// Inclusive lower bound, if any.
        min: Option<usize>,
        /// Inclusive upper bound, if any.
        max: Option<usize>,
    },
    /// The value must be a string matching the expression. The match is a
    /// search anywhere in the string; anchor the pattern to constrain it.
    Pattern(Regex),
    /// The value must equal one of the listed values.
    OneOf(Vec<Value>),
}

impl FieldRule {
    /// Build a [`FieldRule::Pattern`] from a pattern string.
    ///
    /// # Errors
    ///
    /// Returns the underlying regex error if the pattern does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, regex_lite::Error> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Check a single value against this rule.
    ///
    /// Returns a human-readable message on failure. The caller owns the
    /// field path; messages describe only the value.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::Range { min, max } => {
                let Some(n) = value.as_f64() else {
                    return Err(format!(
                        "range rule requires a numeric value, got {}",
                        type_label(value)
                    ));
                };
                if let Some(min) = min {
                    if n < *min {
                        return Err(format!("must be >= {min}, got {n}"));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return Err(format!("must be <= {max}, got {n}"));
                    }
                }
                Ok(())
            }
            Self::Length { min, max } => {
                let len = match value {
                    Value::String(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    Value::Object(members) => members.len(),
                    other => {
                        return Err(format!(
                            "length rule requires a string, array, or object, got {}",
                            type_label(other)
                        ));
                    }
                };
                if let Some(min) = min {
                    if len < *min {
                        return Err(format!("length must be >= {min}, got {len}"));
                    }
                }
                if let Some(max) = max {
                    if len > *max {
                        return Err(format!("length must be <= {max}, got {len}"));
                    }
                }
                Ok(())
            }
            Self::Pattern(re) => match value {
                Value::String(s) if re.is_match(s) => Ok(()),
                Value::String(s) => {
                    Err(format!("'{s}' does not match pattern '{}'", re.as_str()))
                }
                other => Err(format!(
                    "pattern rule requires a string, got {}",
                    type_label(other)
                )),
            },
            Self::OneOf(allowed) => {
                if allowed.contains(value) {
                    Ok(())
                } else {
                    let allowed: Vec<String> =
                        allowed.iter().map(|v| v.to_string()).collect();
                    Err(format!(
                        "must be one of [{}], got {value}",
                        allowed.join(", ")
                    ))
                }
            }
        }
    }
}

/// Declaration of a single schema field.
///
/// Built with [`FieldDescriptor::required`] or [`FieldDescriptor::optional`]
/// and refined with the `with_*` chainers:
///
/// ```
/// use bindery_schema::{FieldDescriptor, FieldKind, FieldRule};
/// use serde_json::json;
///
/// let field = FieldDescriptor::optional("edition", FieldKind::Integer)
///     .with_default(json!(1))
///     .with_rule(FieldRule::Range { min: Some(1.0), max: None });
/// assert!(!field.is_required());
/// ```
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
    rules: Vec<FieldRule>,
}

impl FieldDescriptor {
    /// Declare a field that must be present when a document is loaded or
    /// validated. Dump never enforces presence.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            rules: Vec::new(),
        }
    }

    /// Declare a field that may be absent.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            rules: Vec::new(),
        }
    }

    /// Value injected on load when this field is absent from the document.
    ///
    /// The default is inserted verbatim: it is not checked against the
    /// field's kind or rules. A default on a required field never fires,
    /// since a required absent field is already a violation.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Attach a value rule, checked on load and validate when the value
    /// conforms to the field's kind.
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The field's name, the key it occupies in documents and attribute maps.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shape this field's values must take.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether load and validate require this field to be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The load-time default, if one was declared.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The value rules attached to this field, in declaration order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_range_inclusive_bounds() {
        let rule = FieldRule::Range {
            min: Some(0.0),
            max: Some(10.0),
        };
        assert!(rule.check(&json!(0)).is_ok());
        assert!(rule.check(&json!(10)).is_ok());
        assert!(rule.check(&json!(5.5)).is_ok());
        assert!(rule.check(&json!(-1)).is_err());
        assert!(rule.check(&json!(10.1)).is_err());
    }

    #[test]
    fn test_range_rejects_non_numeric() {
        let rule = FieldRule::Range {
            min: Some(0.0),
            max: None,
        };
        let err = rule.check(&json!("3")).unwrap_err();
        assert!(err.contains("numeric"), "unexpected message: {err}");
    }

    #[test]
    fn test_length_counts_unicode_scalars() {
        let rule = FieldRule::Length {
            min: Some(2),
            max: Some(2),
        };
        // Two scalar values, four UTF-8 bytes.
        assert!(rule.check(&json!("éé")).is_ok());
        assert!(rule.check(&json!("é")).is_err());
    }

    #[test]
    fn test_length_applies_to_arrays_and_objects() {
        let rule = FieldRule::Length {
            min: Some(1),
            max: Some(2),
        };
        assert!(rule.check(&json!([1])).is_ok());
        assert!(rule.check(&json!([1, 2, 3])).is_err());
        assert!(rule.check(&json!({"a": 1, "b": 2})).is_ok());
        assert!(rule.check(&json!(42)).is_err());
    }

    #[test]
    fn test_pattern_searches_anywhere_unless_anchored() {
        let rule = FieldRule::pattern("[0-9]+\\.[0-9]+\\.[0-9]+").unwrap();
        assert!(rule.check(&json!("1.12.3")).is_ok());
        assert!(rule.check(&json!("version 1.12.3 beta")).is_ok());
        assert!(rule.check(&json!("not a version")).is_err());

        let anchored = FieldRule::pattern("^[a-f0-9]{4}$").unwrap();
        assert!(anchored.check(&json!("00ff")).is_ok());
        assert!(anchored.check(&json!("x00ff")).is_err());
    }

    #[test]
    fn test_pattern_rejects_invalid_expression() {
        assert!(FieldRule::pattern("([unclosed").is_err());
    }

    #[test]
    fn test_one_of_compares_whole_values() {
        let rule = FieldRule::OneOf(vec![json!("on"), json!("off"), json!(0)]);
        assert!(rule.check(&json!("on")).is_ok());
        assert!(rule.check(&json!(0)).is_ok());
        let err = rule.check(&json!("standby")).unwrap_err();
        assert!(err.contains("\"on\""), "unexpected message: {err}");
    }

    #[test]
    fn test_descriptor_chainers_accumulate() {
        let field = FieldDescriptor::required("version", FieldKind::String)
            .with_rule(FieldRule::pattern("^[0-9]+").unwrap())
            .with_rule(FieldRule::Length {
                min: Some(1),
                max: Some(16),
            });
        assert_eq!(field.name(), "version");
        assert!(field.is_required());
        assert_eq!(field.rules().len(), 2);
        assert!(field.default().is_none());
    }

    #[test]
    fn test_descriptor_default_is_stored_verbatim() {
        let field = FieldDescriptor::optional("tags", FieldKind::List(Box::new(FieldKind::String)))
            .with_default(json!([]));
        assert_eq!(field.default(), Some(&json!([])));
    }
}
