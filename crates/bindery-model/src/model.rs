//! # Self-Describing Models
//!
//! [`BoundModel`] lets a model type carry its own binding: implement
//! `binding()` to hand out the process-wide [`Bound`] handle (typically a
//! `static` filled on first use), and the document operations become
//! methods on the type itself.

use serde::de::DeserializeOwned;
use serde::Serialize;

use bindery_schema::{ValidationError, ValueMap};

use crate::bound::Bound;

/// A model type that knows its own schema binding.
///
/// ```no_run
/// use std::sync::OnceLock;
///
/// use bindery_model::{bind, Bound, BoundModel};
/// use bindery_schema::{FieldDescriptor, FieldKind, SchemaDefinition};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Person {
///     #[serde(skip_serializing_if = "Option::is_none")]
///     name: Option<String>,
/// }
///
/// impl BoundModel for Person {
///     fn binding() -> &'static Bound<Self> {
///         static BINDING: OnceLock<Bound<Person>> = OnceLock::new();
///         BINDING.get_or_init(|| {
///             let schema = SchemaDefinition::builder("Person")
///                 .field(FieldDescriptor::required("name", FieldKind::String))
///                 .build();
///             bind(schema).expect("first and only binding of Person")
///         })
///     }
/// }
/// ```
pub trait BoundModel: Serialize + DeserializeOwned + Sized + 'static {
    /// The process-wide binding for this model type.
    fn binding() -> &'static Bound<Self>;

    /// Load a raw document and build a model from the validated result.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] per [`Bound::from_dict`].
    fn from_dict(raw: &ValueMap) -> Result<Self, ValidationError> {
        Self::binding().from_dict(raw)
    }

    /// Serialize this model and dump it to a raw document.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] per [`Bound::to_dict`].
    fn to_dict(&self) -> Result<ValueMap, ValidationError> {
        Self::binding().to_dict(self)
    }

    /// Check this model's dumped form against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] carrying every violation found.
    fn validate(&self) -> Result<(), ValidationError> {
        Self::binding().validate(self)
    }

    /// [`Bound::construct`] in postfix form: hand the model back only if
    /// it validates.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] exactly as [`validate`](Self::validate)
    /// does.
    fn validated(self) -> Result<Self, ValidationError> {
        Self::binding().construct(self)
    }
}
