//! # Typed Schema Handles
//!
//! A [`Bound<M>`] pairs one schema definition with one model type and
//! carries documents across the boundary: `from_dict` loads and builds a
//! model, `to_dict` serializes and dumps one, `validate` checks a model's
//! dumped form against the schema, and `construct` is the validating
//! factory. Handles are created by [`bind`], which claims the schema's
//! identity in the process-wide registry exactly once.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use bindery_schema::value::type_label;
use bindery_schema::{SchemaDefinition, ValidationError, Value, ValueMap, Violation};

use crate::registry::{self, BindingError};

/// Bind a schema definition to a model type.
///
/// The definition's identity is claimed in the process-wide registry;
/// holding a `Bound<M>` is proof that `M` is the one type bound to it.
/// Any `Serialize + DeserializeOwned` type whose serialized form is a
/// JSON object qualifies as a model.
///
/// # Errors
///
/// Returns [`BindingError`] when the definition is already bound, to this
/// or any other model type. Bind a definition derived via
/// [`SchemaDefinition::extend`] instead.
pub fn bind<M>(schema: Arc<SchemaDefinition>) -> Result<Bound<M>, BindingError>
where
    M: Serialize + DeserializeOwned + 'static,
{
    registry::claim(schema.id(), schema.name(), std::any::type_name::<M>())?;
    Ok(Bound {
        schema,
        _model: PhantomData,
    })
}

/// A schema definition bound to a model type.
///
/// ## Thread Safety
///
/// `Bound<M>` is `Send + Sync` independent of `M`: it holds only the
/// shared definition. The intended home for one is a `static` the model's
/// [`BoundModel::binding`](crate::BoundModel::binding) hands out.
pub struct Bound<M> {
    schema: Arc<SchemaDefinition>,
    _model: PhantomData<fn() -> M>,
}

impl<M> Bound<M>
where
    M: Serialize + DeserializeOwned + 'static,
{
    /// The bound schema definition.
    pub fn schema(&self) -> &Arc<SchemaDefinition> {
        &self.schema
    }

    /// Load a raw document and build a model from the validated result.
    ///
    /// Unknown keys survive the load and land in whatever member the model
    /// gives them (conventionally a `#[serde(flatten)]` map).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] with the full violation list when the
    /// document does not conform, or with a root violation when the
    /// validated document cannot be deserialized into `M`.
    pub fn from_dict(&self, raw: &ValueMap) -> Result<M, ValidationError> {
        let loaded = self.schema.load(raw)?;
        serde_json::from_value(Value::Object(loaded)).map_err(|e| {
            self.root_violation(format!("cannot build model from validated document: {e}"))
        })
    }

    /// Serialize a model and dump it to a raw document.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the model does not serialize to a
    /// JSON object or a declared value cannot be represented under its
    /// declared kind.
    pub fn to_dict(&self, model: &M) -> Result<ValueMap, ValidationError> {
        let attrs = self.serialize(model)?;
        self.schema.dump(&attrs)
    }

    /// Check a model's dumped form against the schema's load-side rules.
    ///
    /// This is where required fields are enforced for models: a model
    /// whose optional members leave a required field unpopulated fails
    /// here, not in `to_dict`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] carrying every violation found.
    pub fn validate(&self, model: &M) -> Result<(), ValidationError> {
        let dumped = self.to_dict(model)?;
        let violations = self.schema.validate(&dumped);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                schema: self.schema.name().to_string(),
                violations,
            })
        }
    }

    /// Validating factory: hand back the model only if it validates.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] exactly as [`validate`](Self::validate)
    /// does.
    pub fn construct(&self, model: M) -> Result<M, ValidationError> {
        self.validate(&model)?;
        Ok(model)
    }

    fn serialize(&self, model: &M) -> Result<ValueMap, ValidationError> {
        let value = serde_json::to_value(model)
            .map_err(|e| self.root_violation(format!("cannot serialize model: {e}")))?;
        match value {
            Value::Object(attrs) => Ok(attrs),
            other => Err(self.root_violation(format!(
                "model must serialize to an object, got {}",
                type_label(&other)
            ))),
        }
    }

    fn root_violation(&self, message: String) -> ValidationError {
        ValidationError {
            schema: self.schema.name().to_string(),
            violations: vec![Violation {
                field: String::new(),
                message,
            }]
            .into(),
        }
    }
}

impl<M> Clone for Bound<M> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Bound<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound")
            .field("schema", &self.schema.name())
            .field("model", &std::any::type_name::<M>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_schema::{FieldDescriptor, FieldKind};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i64,
        y: i64,
    }

    fn point_schema() -> Arc<SchemaDefinition> {
        SchemaDefinition::builder("Point")
            .field(FieldDescriptor::required("x", FieldKind::Integer))
            .field(FieldDescriptor::required("y", FieldKind::Integer))
            .build()
    }

    fn map(value: Value) -> ValueMap {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_from_dict_builds_model() {
        let bound = bind::<Point>(point_schema()).unwrap();
        let point = bound.from_dict(&map(json!({"x": 1, "y": 2}))).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }

    #[test]
    fn test_from_dict_fails_on_schema_violation() {
        let bound = bind::<Point>(point_schema()).unwrap();
        let err = bound.from_dict(&map(json!({"x": 1}))).unwrap_err();
        assert_eq!(err.violations.violations()[0].field, "y");
    }

    #[test]
    fn test_from_dict_deserialization_failure_is_root_violation() {
        // Schema admits any shape for "x"; the model insists on i64.
        let schema = SchemaDefinition::builder("LoosePoint")
            .field(FieldDescriptor::required("x", FieldKind::Any))
            .field(FieldDescriptor::required("y", FieldKind::Any))
            .build();
        let bound = bind::<Point>(schema).unwrap();
        let err = bound
            .from_dict(&map(json!({"x": "one", "y": 2})))
            .unwrap_err();
        let v = &err.violations.violations()[0];
        assert!(v.field.is_empty());
        assert!(v.message.contains("cannot build model"));
    }

    #[test]
    fn test_to_dict_round_trips() {
        let bound = bind::<Point>(point_schema()).unwrap();
        let dumped = bound.to_dict(&Point { x: 3, y: 4 }).unwrap();
        assert_eq!(dumped, map(json!({"x": 3, "y": 4})));
    }

    #[test]
    fn test_construct_returns_model_on_success() {
        let bound = bind::<Point>(point_schema()).unwrap();
        let point = bound.construct(Point { x: 0, y: 0 }).unwrap();
        assert_eq!(point, Point { x: 0, y: 0 });
    }

    #[test]
    fn test_non_object_model_is_rejected() {
        // A bare vector serializes to an array, not an object.
        let schema = SchemaDefinition::builder("Row").build();
        let bound = bind::<Vec<i64>>(schema).unwrap();
        let err = bound.to_dict(&vec![1, 2, 3]).unwrap_err();
        assert!(err.violations.violations()[0]
            .message
            .contains("must serialize to an object, got array"));
    }

    #[test]
    fn test_bound_debug_names_schema_and_model() {
        let bound = bind::<Point>(point_schema()).unwrap();
        let debug = format!("{bound:?}");
        assert!(debug.contains("Point"));
    }
}
