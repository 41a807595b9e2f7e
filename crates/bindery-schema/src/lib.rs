//! # bindery-schema — Declarative Schema Engine
//!
//! This crate is the core of Bindery. A schema is built at runtime as an
//! ordered set of field descriptors; the engine then moves JSON documents
//! across the schema boundary in two directions:
//!
//! - **load**: raw document in, validated attribute map out. Presence,
//!   shape, and rule checks run; defaults fill absent optional fields.
//! - **dump**: attribute map in, raw document out. Only declared shapes
//!   are guarded; programs are trusted with their own values.
//!
//! `validate` runs the load-side checks without producing output and hands
//! back the complete violation list, empty when the document conforms.
//!
//! ## Key Design Principles
//!
//! 1. **Collect everything, then fail.** Operations never stop at the
//!    first problem. A [`ValidationError`] carries one [`Violation`] per
//!    offending field with a dotted path (`author.name`, `tracks[2].side`).
//!
//! 2. **Unrecognized data is not an error.** Keys no descriptor covers
//!    pass through load and dump verbatim, so documents from newer peers
//!    survive a round trip losslessly.
//!
//! 3. **Definitions are identities.** A [`SchemaDefinition`] is immutable,
//!    carries a unique [`SchemaId`], and is shared via `Arc`. Deriving a
//!    variant goes through [`SchemaDefinition::extend`], never cloning.
//!
//! 4. **Polymorphism is data-driven.** A [`PolymorphicChoice`] field picks
//!    its schema per value through tag hints, with separate load and dump
//!    hints when the two forms carry the tag differently.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests; engine failures are
//!   structured errors.
//! - Everything here is `Send + Sync`; build once, use from any thread.

pub mod choice;
pub mod error;
pub mod field;
pub mod schema;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use choice::{ChoiceBuilder, Hinted, NoHint, PolymorphicChoice, TagHint};
pub use error::{Direction, SchemaSelectionError, ValidationError, Violation, Violations};
pub use field::{FieldDescriptor, FieldKind, FieldRule};
pub use schema::{SchemaBuilder, SchemaDefinition, SchemaId};
pub use value::{Value, ValueMap};
