//! # Violations and Error Types
//!
//! Every engine operation collects the complete set of problems it finds
//! before failing: a document with three bad fields produces three
//! [`Violation`]s in one [`ValidationError`], not one error per attempt.
//!
//! [`SchemaSelectionError`] is the polymorphic resolver's failure: a value
//! whose tag hint produced an unknown tag, or no tag at all. When selection
//! fails inside an engine operation it is folded into the violation list at
//! the offending field's path.

use std::fmt;

use thiserror::Error;

/// The direction of an engine operation.
///
/// `Load` takes raw documents toward validated attribute maps; `Dump` takes
/// attribute maps back toward raw documents. Field rules and defaults apply
/// only on the load side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Raw document in, validated attribute map out.
    Load,
    /// Attribute map in, raw document out.
    Dump,
}

impl Direction {
    /// The canonical lowercase name of this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Dump => "dump",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Dotted path to the violating field (`author.name`, `tracks[2].side`).
    /// Empty for violations against the document as a whole.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.field, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// The document did not conform to the schema.
///
/// Carries every violation found during the operation, not just the first.
#[derive(Error, Debug)]
#[error("validation failed against schema '{schema}':\n{violations}")]
pub struct ValidationError {
    /// Name of the schema that was validated against.
    pub schema: String,
    /// Structured list of individual violations.
    pub violations: Violations,
}

/// A polymorphic field could not be resolved to a schema variant.
#[derive(Error, Debug)]
#[error("cannot select a schema variant for {direction}: {}", describe_selection(.tag, .known))]
pub struct SchemaSelectionError {
    /// The operation direction in which selection was attempted.
    pub direction: Direction,
    /// The tag the hint derived from the value, if it derived one at all.
    pub tag: Option<String>,
    /// The tags registered on the choice, in declaration order.
    pub known: Vec<String>,
}

fn describe_selection(tag: &Option<String>, known: &[String]) -> String {
    let known = if known.is_empty() {
        "none".to_string()
    } else {
        known.join(", ")
    };
    match tag {
        Some(tag) => format!("unknown tag '{tag}' (known tags: {known})"),
        None => format!("no tag could be derived from the value (known tags: {known})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display_with_field() {
        let v = Violation {
            field: "author.name".to_string(),
            message: "is required but missing".to_string(),
        };
        let display = v.to_string();
        assert!(display.contains("author.name"));
        assert!(display.contains("is required but missing"));
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            field: String::new(),
            message: "expected a JSON object".to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }

    #[test]
    fn test_violations_display_one_per_line() {
        let vs: Violations = vec![
            Violation {
                field: "a".to_string(),
                message: "first".to_string(),
            },
            Violation {
                field: "b".to_string(),
                message: "second".to_string(),
            },
        ]
        .into();
        let display = vs.to_string();
        assert_eq!(display.lines().count(), 2);
        assert_eq!(vs.len(), 2);
        assert!(!vs.is_empty());
    }

    #[test]
    fn test_validation_error_display_includes_schema_name() {
        let err = ValidationError {
            schema: "Person".to_string(),
            violations: vec![Violation {
                field: "name".to_string(),
                message: "is required but missing".to_string(),
            }]
            .into(),
        };
        let display = err.to_string();
        assert!(display.contains("'Person'"));
        assert!(display.contains("name: is required"));
    }

    #[test]
    fn test_selection_error_unknown_tag() {
        let err = SchemaSelectionError {
            direction: Direction::Load,
            tag: Some("cassette".to_string()),
            known: vec!["album".to_string(), "book".to_string()],
        };
        let display = err.to_string();
        assert!(display.contains("load"));
        assert!(display.contains("unknown tag 'cassette'"));
        assert!(display.contains("album, book"));
    }

    #[test]
    fn test_selection_error_no_tag_derived() {
        let err = SchemaSelectionError {
            direction: Direction::Dump,
            tag: None,
            known: vec![],
        };
        let display = err.to_string();
        assert!(display.contains("dump"));
        assert!(display.contains("no tag could be derived"));
        assert!(display.contains("known tags: none"));
    }
}
