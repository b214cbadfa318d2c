//! Shared validation result types for repository drafts.

use crate::core::repository::RepoField;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether validation passed
    pub is_valid: bool,

    /// List of field errors, in form order
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Add an error
    pub fn with_error(mut self, error: FieldError) -> Self {
        self.errors.push(error);
        self.is_valid = false;
        self
    }

    /// First error reported for `field`, if any
    pub fn error_for(&self, field: RepoField) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Errors joined into a single line for notifications
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A rejected field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: RepoField,

    /// Name of the rule that rejected the value
    pub validator: String,

    /// Human-readable rejection reason
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}
