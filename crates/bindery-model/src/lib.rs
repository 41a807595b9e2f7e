//! # bindery-model — Schema-to-Type Binding
//!
//! Where `bindery-schema` moves untyped documents across a schema boundary,
//! this crate ties a schema definition to a concrete Rust type. [`bind`]
//! claims a definition's identity for a model type, exactly once per
//! process; the resulting [`Bound`] handle loads documents into models,
//! dumps models back out, and validates models against the schema's
//! load-side rules. [`BoundModel`] puts those operations on the model type
//! itself.
//!
//! ## Key Design Principles
//!
//! 1. **One definition, one model.** The binding registry rejects a second
//!    claim on the same [`SchemaId`] outright. A schema meant for several
//!    types is extended per type, each extension carrying its own identity.
//!
//! 2. **Models are ordinary serde types.** Anything `Serialize +
//!    DeserializeOwned` that serializes to a JSON object binds. Unknown
//!    document keys survive through a `#[serde(flatten)]` map member.
//!
//! 3. **Validation speaks the schema's language.** Every failure is a
//!    [`ValidationError`] with the complete violation list; model
//!    (de)serialization failures surface as a root-path violation rather
//!    than a separate error type.
//!
//! [`SchemaId`]: bindery_schema::SchemaId
//! [`ValidationError`]: bindery_schema::ValidationError

pub mod bound;
pub mod model;
pub mod registry;

// Re-export primary types for ergonomic imports.
pub use bound::{bind, Bound};
pub use model::BoundModel;
pub use registry::{bound_model, BindingError};
