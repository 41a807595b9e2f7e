//! # Schema Definitions and the Engine
//!
//! A [`SchemaDefinition`] is an immutable, named, ordered set of field
//! descriptors with a unique identity. It offers the three engine
//! operations:
//!
//! - [`load`](SchemaDefinition::load): raw document in, validated attribute
//!   map out. Presence, shape, and rule checks run; defaults are injected
//!   for absent optional fields.
//! - [`dump`](SchemaDefinition::dump): attribute map in, raw document out.
//!   Only shape checks run; absent declared fields are skipped silently.
//! - [`validate`](SchemaDefinition::validate): the load-side checks without
//!   producing output, returning the complete violation list.
//!
//! ## Key Invariants
//!
//! 1. **Complete collection.** An operation reports every violation it
//!    finds, never just the first. Violation paths are dotted
//!    (`author.name`) with bracketed indexes for list elements
//!    (`tracks[2].side`).
//!
//! 2. **Symmetric passthrough.** Keys not covered by any descriptor flow
//!    through load and dump verbatim, so unrecognized data survives a
//!    round trip unchanged.
//!
//! 3. **Load/dump asymmetry.** Field rules and defaults exist only on the
//!    load side. For schemas that declare no defaults, `dump(load(d)) == d`
//!    for every document `d` that loads successfully.
//!
//! ## Thread Safety
//!
//! Definitions are immutable after [`SchemaBuilder::build`] and shared via
//! `Arc`, so a `SchemaDefinition` can be used from any number of threads.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Direction, ValidationError, Violation, Violations};
use crate::field::{FieldDescriptor, FieldKind};
use crate::value::{type_label, Value, ValueMap};

// ── Schema Identity ──────────────────────────────────────────────────

/// The unique identity of a schema definition.
///
/// Every built definition gets a fresh id; [`SchemaDefinition::extend`]
/// produces a definition with a new id even when no field changed. Model
/// bindings key off this identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaId(Uuid);

impl SchemaId {
    /// Create a new random schema identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a schema identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SchemaId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SchemaId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SchemaId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

// ── Schema Definition ────────────────────────────────────────────────

/// An immutable, named, ordered set of field descriptors.
///
/// Definitions are deliberately not `Clone`: identity matters (model
/// bindings attach to a specific definition), so they are shared via
/// `Arc` instead. To derive a variant of an existing definition, use
/// [`extend`](SchemaDefinition::extend), which inherits the fields under
/// a fresh identity.
#[derive(Debug)]
pub struct SchemaDefinition {
    id: SchemaId,
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaDefinition {
    /// Start building a definition with the given name.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The definition's unique identity.
    pub fn id(&self) -> &SchemaId {
        &self.id
    }

    /// The definition's name, used in error reporting.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field descriptors, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor by field name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Start building a definition that inherits this definition's fields
    /// under a new name and a fresh identity.
    ///
    /// Redeclaring an inherited field on the returned builder replaces it
    /// in place. This is the supported way to reuse a schema that is
    /// already bound to a model: the extension carries its own identity,
    /// so binding it does not collide with the original.
    pub fn extend(&self, name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: self.fields.clone(),
        }
    }

    // ── Engine Operations ────────────────────────────────────────────

    /// Load a raw document into a validated attribute map.
    ///
    /// Declared fields are checked for presence, shape, and rules.
    /// Absent optional fields with a default get the default injected
    /// verbatim. Unknown keys pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] carrying every violation found.
    pub fn load(&self, raw: &ValueMap) -> Result<ValueMap, ValidationError> {
        let (out, violations) = self.run(raw, Direction::Load);
        self.finish(out, violations)
    }

    /// Dump an attribute map into a raw document.
    ///
    /// Declared present values are checked against their shape only:
    /// rules do not run, defaults are not injected, and absent declared
    /// fields are skipped silently. Unknown keys pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if any declared value cannot be
    /// represented under its declared kind.
    pub fn dump(&self, attrs: &ValueMap) -> Result<ValueMap, ValidationError> {
        let (out, violations) = self.run(attrs, Direction::Dump);
        self.finish(out, violations)
    }

    /// Run the load-side checks against a document without producing
    /// output. An empty [`Violations`] means the document would load.
    pub fn validate(&self, data: &ValueMap) -> Violations {
        let (_, violations) = self.run(data, Direction::Load);
        violations.into()
    }

    fn finish(
        &self,
        out: ValueMap,
        violations: Vec<Violation>,
    ) -> Result<ValueMap, ValidationError> {
        if violations.is_empty() {
            Ok(out)
        } else {
            Err(ValidationError {
                schema: self.name.clone(),
                violations: violations.into(),
            })
        }
    }

    /// Single pass over the input: declared fields in declaration order,
    /// then unknown keys. Returns the produced map and every violation
    /// found; the map is only meaningful when the violation list is empty.
    fn run(&self, input: &ValueMap, direction: Direction) -> (ValueMap, Vec<Violation>) {
        let mut out = ValueMap::new();
        let mut violations = Vec::new();

        for field in &self.fields {
            match input.get(field.name()) {
                Some(value) => {
                    let before = violations.len();
                    let checked =
                        check_value(field.kind(), value, field.name(), direction, &mut violations);
                    let shape_ok = violations.len() == before;
                    // Rules are load-side and presume a conforming shape.
                    if direction == Direction::Load && shape_ok {
                        for rule in field.rules() {
                            if let Err(message) = rule.check(value) {
                                violations.push(Violation {
                                    field: field.name().to_string(),
                                    message,
                                });
                            }
                        }
                    }
                    out.insert(field.name().to_string(), checked);
                }
                None => match direction {
                    Direction::Load => {
                        if field.is_required() {
                            violations.push(Violation {
                                field: field.name().to_string(),
                                message: "is required but missing".to_string(),
                            });
                        } else if let Some(default) = field.default() {
                            out.insert(field.name().to_string(), default.clone());
                        }
                    }
                    // Absence is legitimate on dump; validate owns
                    // presence checks.
                    Direction::Dump => {}
                },
            }
        }

        // Unknown keys pass through verbatim in both directions.
        for (key, value) in input {
            if self.field(key).is_none() {
                out.insert(key.clone(), value.clone());
            }
        }

        (out, violations)
    }
}

/// Check one value against a kind, appending any violations found and
/// returning the value as it appears in the produced map. Nested and
/// polymorphic kinds recurse through the owning schema's pass.
fn check_value(
    kind: &FieldKind,
    value: &Value,
    path: &str,
    direction: Direction,
    violations: &mut Vec<Violation>,
) -> Value {
    match kind {
        FieldKind::Any => value.clone(),
        FieldKind::Boolean => {
            if !value.is_boolean() {
                violations.push(shape_mismatch(kind, value, path));
            }
            value.clone()
        }
        FieldKind::Integer => {
            let is_integer = match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                _ => false,
            };
            if !is_integer {
                violations.push(shape_mismatch(kind, value, path));
            }
            value.clone()
        }
        FieldKind::Number => {
            if !value.is_number() {
                violations.push(shape_mismatch(kind, value, path));
            }
            value.clone()
        }
        FieldKind::String => {
            if !value.is_string() {
                violations.push(shape_mismatch(kind, value, path));
            }
            value.clone()
        }
        FieldKind::Date => {
            match value {
                Value::String(s) => {
                    if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                        violations.push(Violation {
                            field: path.to_string(),
                            message: format!(
                                "'{s}' is not a valid calendar date (expected YYYY-MM-DD)"
                            ),
                        });
                    }
                }
                other => violations.push(shape_mismatch(kind, other, path)),
            }
            value.clone()
        }
        FieldKind::DateTime => {
            match value {
                Value::String(s) => {
                    if DateTime::parse_from_rfc3339(s).is_err() {
                        violations.push(Violation {
                            field: path.to_string(),
                            message: format!("'{s}' is not a valid RFC 3339 datetime"),
                        });
                    }
                }
                other => violations.push(shape_mismatch(kind, other, path)),
            }
            value.clone()
        }
        FieldKind::Map => {
            if !value.is_object() {
                violations.push(shape_mismatch(kind, value, path));
            }
            value.clone()
        }
        FieldKind::List(inner) => match value {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        check_value(inner, item, &format!("{path}[{i}]"), direction, violations)
                    })
                    .collect(),
            ),
            other => {
                violations.push(shape_mismatch(kind, other, path));
                other.clone()
            }
        },
        FieldKind::Nested(schema) => apply_schema(schema, value, path, direction, violations),
        FieldKind::Choice(choice) => {
            let resolved = match direction {
                Direction::Load => choice.resolve_for_load(value),
                Direction::Dump => choice.resolve_for_dump(value),
            };
            match resolved {
                Ok(schema) => apply_schema(schema, value, path, direction, violations),
                Err(err) => {
                    violations.push(Violation {
                        field: path.to_string(),
                        message: err.to_string(),
                    });
                    value.clone()
                }
            }
        }
    }
}

/// Run a sub-schema against a value expected to be an object, folding its
/// violations into the parent's list with dotted path prefixes.
fn apply_schema(
    schema: &SchemaDefinition,
    value: &Value,
    path: &str,
    direction: Direction,
    violations: &mut Vec<Violation>,
) -> Value {
    match value {
        Value::Object(members) => {
            let (out, nested) = schema.run(members, direction);
            for v in nested {
                violations.push(Violation {
                    field: format!("{path}.{}", v.field),
                    message: v.message,
                });
            }
            Value::Object(out)
        }
        other => {
            violations.push(Violation {
                field: path.to_string(),
                message: format!(
                    "expected object conforming to schema '{}', got {}",
                    schema.name(),
                    type_label(other)
                ),
            });
            other.clone()
        }
    }
}

fn shape_mismatch(kind: &FieldKind, value: &Value, path: &str) -> Violation {
    Violation {
        field: path.to_string(),
        message: format!(
            "expected {}, got {}",
            kind.expected_shape(),
            type_label(value)
        ),
    }
}

// ── Schema Builder ───────────────────────────────────────────────────

/// Builder for a [`SchemaDefinition`].
///
/// Fields keep their declaration order. Declaring a field whose name is
/// already present replaces the earlier descriptor in place, which is how
/// an extension narrows or widens an inherited field.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Add a field descriptor, replacing any earlier descriptor with the
    /// same name.
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        if let Some(slot) = self
            .fields
            .iter_mut()
            .find(|f| f.name() == descriptor.name())
        {
            debug!(
                schema = %self.name,
                field = %descriptor.name(),
                "replacing redeclared field descriptor"
            );
            *slot = descriptor;
        } else {
            self.fields.push(descriptor);
        }
        self
    }

    /// Finish the definition under a fresh [`SchemaId`] and share it.
    pub fn build(self) -> Arc<SchemaDefinition> {
        Arc::new(SchemaDefinition {
            id: SchemaId::new(),
            name: self.name,
            fields: self.fields,
        })
    }
}
