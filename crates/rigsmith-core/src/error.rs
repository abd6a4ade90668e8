//! # Error Types
//!
//! Domain-specific error types for rigsmith-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rigsmith-core errors (this file)                                      │
//! │  ├── CoreError        - Registry construction failures                 │
//! │  └── ValidationError  - Field-level normalization failures             │
//! │                                                                         │
//! │  rigsmith-db errors (separate crate)                                   │
//! │  └── DbError          - Repository failures                            │
//! │                                                                         │
//! │  Flow: ValidationError → Issue (never escapes the pipeline)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `ValidationError` is always captured by the pipeline and turned into a
//! structured `Issue`; it is a value, not a crash.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while building core data structures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A profile detection pattern is not a valid regular expression.
    #[error("Invalid pattern '{pattern}' in profile {profile}: {reason}")]
    InvalidPattern {
        profile: String,
        pattern: String,
        reason: String,
    },

    /// Two profiles share the same id.
    #[error("Duplicate profile id: {0}")]
    DuplicateProfile(String),

    /// A profile declares the same attribute name twice.
    #[error("Profile {profile} declares '{field}' more than once")]
    DuplicateDeclaration { profile: String, field: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level normalization failures.
///
/// Every variant names the field and, where one exists, the offending value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range after unit conversion.
    #[error("{field} value {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Invalid format (unparsable number, unknown unit, ...).
    #[error("{field} has invalid format '{value}': {reason}")]
    InvalidFormat {
        field: String,
        value: String,
        reason: String,
    },

    /// Value is not in the allowed set.
    #[error("{field} value '{value}' is not recognised, expected one of: {suggestions:?}")]
    NotAllowed {
        field: String,
        value: String,
        suggestions: Vec<String>,
    },

    /// Value conflicts with a sibling field on the same component.
    #[error("{field} value '{value}' is incompatible with {other_field} '{other_value}'")]
    Incompatible {
        field: String,
        value: String,
        other_field: String,
        other_value: String,
    },
}

impl ValidationError {
    /// Name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Incompatible { field, .. } => field,
        }
    }

    /// Canonical alternatives for the rejected value, if any.
    pub fn suggestions(&self) -> &[String] {
        match self {
            ValidationError::NotAllowed { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    pub(crate) fn invalid_format(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_allowed(
        field: impl Into<String>,
        value: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        ValidationError::NotAllowed {
            field: field.into(),
            value: value.into(),
            suggestions,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "socket".to_string(),
        };
        assert_eq!(err.to_string(), "socket is required");

        let err = ValidationError::OutOfRange {
            field: "tdp".to_string(),
            value: 900.0,
            min: 1.0,
            max: 500.0,
        };
        assert_eq!(
            err.to_string(),
            "tdp value 900 is outside the allowed range 1..=500"
        );
    }

    #[test]
    fn test_suggestions_only_for_not_allowed() {
        let err = ValidationError::not_allowed("socket", "Socket Z", vec!["AM5".to_string()]);
        assert_eq!(err.suggestions(), ["AM5".to_string()]);
        assert_eq!(err.field(), "socket");

        let err = ValidationError::invalid_format("frequency", "fast", "not a number");
        assert!(err.suggestions().is_empty());
    }

    #[test]
    fn test_core_error_messages() {
        let err = CoreError::DuplicateDeclaration {
            profile: "cpu".to_string(),
            field: "socket".to_string(),
        };
        assert_eq!(err.to_string(), "Profile cpu declares 'socket' more than once");
    }
}
