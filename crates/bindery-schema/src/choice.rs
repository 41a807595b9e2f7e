//! # Polymorphic Schema Selection
//!
//! A [`PolymorphicChoice`] field holds several candidate schemas keyed by
//! tag. Per value, a hint function derives a tag from the value itself and
//! the matching variant's schema is applied. Load and dump may use
//! different hints: a raw document and its attribute-map form often carry
//! the discriminating information in different places.
//!
//! ## Builder Pattern: Compile-Time Hint Enforcement
//!
//! ```text
//! // This compiles: a load hint is set.
//! let choice = PolymorphicChoice::builder()
//!     .variant("book", book_schema)
//!     .variant("album", album_schema)
//!     .load_hint(|raw| ...)
//!     .build();
//!
//! // This does NOT compile: no .build() method on ChoiceBuilder<NoHint>.
//! let choice = PolymorphicChoice::builder()
//!     .variant("book", book_schema)
//!     .build(); // ERROR: no method named `build`
//! ```
//!
//! A choice without a load hint can never resolve anything, so the builder
//! makes the hint mandatory at the type level. The dump hint is optional
//! and falls back to the load hint.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{Direction, SchemaSelectionError};
use crate::schema::SchemaDefinition;
use crate::value::Value;

/// A tag hint: derives the variant tag from the value under inspection,
/// or `None` when the value carries no recognizable tag.
pub type TagHint = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// An ordered set of tagged schema variants with per-direction tag hints.
///
/// ## Thread Safety
///
/// `PolymorphicChoice` is `Send + Sync`: variants are shared
/// [`SchemaDefinition`]s and hints are required to be `Send + Sync`.
/// Cloning shares the variants and hints.
#[derive(Clone)]
pub struct PolymorphicChoice {
    variants: Vec<(String, Arc<SchemaDefinition>)>,
    load_hint: TagHint,
    dump_hint: TagHint,
}

impl PolymorphicChoice {
    /// Start building a choice. See the module docs for the shape of the
    /// builder chain.
    pub fn builder() -> ChoiceBuilder<NoHint> {
        ChoiceBuilder {
            variants: Vec::new(),
            load_hint: None,
            dump_hint: None,
            _hint_marker: PhantomData,
        }
    }

    /// The registered tags, in declaration order.
    pub fn tags(&self) -> Vec<&str> {
        self.variants.iter().map(|(tag, _)| tag.as_str()).collect()
    }

    /// Look up a variant's schema by tag.
    pub fn variant(&self, tag: &str) -> Option<&Arc<SchemaDefinition>> {
        self.variants
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, schema)| schema)
    }

    /// Select the schema for a raw document value being loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaSelectionError`] when the load hint derives no tag
    /// or derives a tag no variant is registered under.
    pub fn resolve_for_load(
        &self,
        raw: &Value,
    ) -> Result<&Arc<SchemaDefinition>, SchemaSelectionError> {
        self.resolve(raw, Direction::Load)
    }

    /// Select the schema for an attribute value being dumped.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaSelectionError`] when the dump hint derives no tag
    /// or derives a tag no variant is registered under.
    pub fn resolve_for_dump(
        &self,
        value: &Value,
    ) -> Result<&Arc<SchemaDefinition>, SchemaSelectionError> {
        self.resolve(value, Direction::Dump)
    }

    fn resolve(
        &self,
        value: &Value,
        direction: Direction,
    ) -> Result<&Arc<SchemaDefinition>, SchemaSelectionError> {
        let hint = match direction {
            Direction::Load => &self.load_hint,
            Direction::Dump => &self.dump_hint,
        };
        let tag = hint(value);
        if let Some(tag) = &tag {
            if let Some(schema) = self.variant(tag) {
                return Ok(schema);
            }
        }
        Err(SchemaSelectionError {
            direction,
            tag,
            known: self.variants.iter().map(|(t, _)| t.clone()).collect(),
        })
    }
}

impl fmt::Debug for PolymorphicChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolymorphicChoice")
            .field("tags", &self.tags())
            .finish_non_exhaustive()
    }
}

// ── Builder Types ────────────────────────────────────────────────────

/// Marker type: no load hint has been set on the builder.
#[derive(Debug)]
pub struct NoHint;

/// Marker type: a load hint has been set on the builder.
#[derive(Debug)]
pub struct Hinted;

/// Builder for a [`PolymorphicChoice`] with compile-time hint enforcement.
///
/// Only `ChoiceBuilder<Hinted>` has a `.build()` method, and the only way
/// to reach `Hinted` is [`ChoiceBuilder::load_hint`].
pub struct ChoiceBuilder<H> {
    variants: Vec<(String, Arc<SchemaDefinition>)>,
    load_hint: Option<TagHint>,
    dump_hint: Option<TagHint>,
    _hint_marker: PhantomData<H>,
}

impl ChoiceBuilder<NoHint> {
    /// Set the load-side tag hint. Transitions the builder from `NoHint`
    /// to `Hinted`, enabling the `.build()` method.
    pub fn load_hint(
        self,
        hint: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> ChoiceBuilder<Hinted> {
        ChoiceBuilder {
            variants: self.variants,
            load_hint: Some(Arc::new(hint)),
            dump_hint: self.dump_hint,
            _hint_marker: PhantomData,
        }
    }
}

impl ChoiceBuilder<Hinted> {
    /// Build the choice. Only available once a load hint is set. The dump
    /// hint falls back to the load hint when none was given.
    pub fn build(self) -> PolymorphicChoice {
        let load_hint = self.load_hint.expect("Hinted guarantees this is Some");
        let dump_hint = self.dump_hint.unwrap_or_else(|| Arc::clone(&load_hint));
        PolymorphicChoice {
            variants: self.variants,
            load_hint,
            dump_hint,
        }
    }
}

impl<H> ChoiceBuilder<H> {
    /// Register a schema variant under a tag. Registering a tag that is
    /// already present replaces that variant in place, preserving its
    /// position in the declaration order.
    pub fn variant(mut self, tag: impl Into<String>, schema: Arc<SchemaDefinition>) -> Self {
        let tag = tag.into();
        if let Some(slot) = self.variants.iter_mut().find(|(t, _)| *t == tag) {
            slot.1 = schema;
        } else {
            self.variants.push((tag, schema));
        }
        self
    }

    /// Set the dump-side tag hint. Without one, dump resolution uses the
    /// load hint.
    pub fn dump_hint(
        mut self,
        hint: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.dump_hint = Some(Arc::new(hint));
        self
    }
}

impl<H> fmt::Debug for ChoiceBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.variants.iter().map(|(t, _)| t.as_str()).collect();
        f.debug_struct("ChoiceBuilder")
            .field("tags", &tags)
            .field("has_load_hint", &self.load_hint.is_some())
            .field("has_dump_hint", &self.dump_hint.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDescriptor, FieldKind};
    use serde_json::json;

    fn schema(name: &str, field: &str) -> Arc<SchemaDefinition> {
        SchemaDefinition::builder(name)
            .field(FieldDescriptor::required(field, FieldKind::String))
            .build()
    }

    /// Hint keying off which discriminating member the object carries.
    fn by_member(value: &Value) -> Option<String> {
        let members = value.as_object()?;
        if members.contains_key("title") {
            Some("book".to_string())
        } else if members.contains_key("album_name") {
            Some("album".to_string())
        } else {
            None
        }
    }

    fn book_or_album() -> PolymorphicChoice {
        PolymorphicChoice::builder()
            .variant("book", schema("Book", "title"))
            .variant("album", schema("Album", "album_name"))
            .load_hint(by_member)
            .build()
    }

    #[test]
    fn test_tags_preserve_declaration_order() {
        let choice = book_or_album();
        assert_eq!(choice.tags(), vec!["book", "album"]);
    }

    #[test]
    fn test_redeclared_tag_replaces_in_place() {
        let choice = PolymorphicChoice::builder()
            .variant("book", schema("Book", "title"))
            .variant("album", schema("Album", "album_name"))
            .variant("book", schema("RevisedBook", "title"))
            .load_hint(by_member)
            .build();
        assert_eq!(choice.tags(), vec!["book", "album"]);
        assert_eq!(choice.variant("book").unwrap().name(), "RevisedBook");
    }

    #[test]
    fn test_resolve_for_load_selects_by_hint() {
        let choice = book_or_album();
        let selected = choice
            .resolve_for_load(&json!({"title": "Sirens of Titan"}))
            .unwrap();
        assert_eq!(selected.name(), "Book");
    }

    #[test]
    fn test_resolve_unknown_tag_reports_known_tags() {
        let choice = PolymorphicChoice::builder()
            .variant("book", schema("Book", "title"))
            .load_hint(|_| Some("cassette".to_string()))
            .build();
        let err = choice.resolve_for_load(&json!({})).unwrap_err();
        assert_eq!(err.direction, Direction::Load);
        assert_eq!(err.tag.as_deref(), Some("cassette"));
        assert_eq!(err.known, vec!["book".to_string()]);
    }

    #[test]
    fn test_resolve_without_derivable_tag() {
        let choice = book_or_album();
        let err = choice.resolve_for_load(&json!({"artist": "x"})).unwrap_err();
        assert!(err.tag.is_none());
    }

    #[test]
    fn test_dump_hint_falls_back_to_load_hint() {
        let choice = book_or_album();
        let selected = choice
            .resolve_for_dump(&json!({"album_name": "Psychence"}))
            .unwrap();
        assert_eq!(selected.name(), "Album");
    }

    #[test]
    fn test_separate_dump_hint_takes_precedence() {
        let choice = PolymorphicChoice::builder()
            .variant("book", schema("Book", "title"))
            .variant("album", schema("Album", "album_name"))
            .dump_hint(|_| Some("album".to_string()))
            .load_hint(|_| Some("book".to_string()))
            .build();
        let loaded = choice.resolve_for_load(&json!({})).unwrap();
        assert_eq!(loaded.name(), "Book");
        let dumped = choice.resolve_for_dump(&json!({})).unwrap();
        assert_eq!(dumped.name(), "Album");
    }
}
