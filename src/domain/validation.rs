//! Field-level validation
//!
//! Request payloads are checked field by field and every violation is
//! collected, so a client receives all problems with a body in one response.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field, as it appears on the wire
    pub field: String,

    /// Human-readable description of the violation
    pub message: String,
}

impl FieldError {
    /// Creates a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collection of field violations for one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection holding exactly one violation
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records a violation
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Returns true when no violation was recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All recorded violations, in the order they were found
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns `Ok(value)` if nothing was recorded, otherwise `Err(self)`
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Number of characters in `value`, not bytes
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Records `message` when `value` is absent or blank
pub fn require_not_blank(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    message: &str,
) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        errors.add(field, message);
    }
}

/// Records `message` when `value` is longer than `max` characters
pub fn max_chars(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
    message: &str,
) {
    if value.is_some_and(|v| char_len(v) > max) {
        errors.add(field, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_passes() {
        let errors = ValidationErrors::new();
        assert_eq!(errors.into_result(7).unwrap(), 7);
    }

    #[test]
    fn test_display_joins_all_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Doctor name is required");
        errors.add("specialization", "Specialization is required");

        assert_eq!(
            errors.to_string(),
            "name: Doctor name is required; specialization: Specialization is required"
        );
    }

    #[test]
    fn test_require_not_blank() {
        let mut errors = ValidationErrors::new();
        require_not_blank(&mut errors, "a", None, "missing");
        require_not_blank(&mut errors, "b", Some("   "), "blank");
        require_not_blank(&mut errors, "c", Some("ok"), "never");

        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["a", "b"]);
    }

    #[test]
    fn test_max_chars_counts_characters() {
        let mut errors = ValidationErrors::new();
        // Five characters, ten bytes
        max_chars(&mut errors, "notes", Some("ééééé"), 5, "too long");
        assert!(errors.is_empty());

        max_chars(&mut errors, "notes", Some("éééééé"), 5, "too long");
        assert_eq!(errors.errors().len(), 1);
    }
}
