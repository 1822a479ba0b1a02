//! Core error types for formwork.
//!
//! Two kinds of failure exist and they never mix:
//!
//! - [`ValidationError`] describes bad user input. It is recovered into
//!   field state (a bound field's `error`) and surfaced through
//!   `is_valid()`; it is never fatal.
//! - [`FormworkError`] describes integration problems: an unsupported
//!   request method, an input value of the wrong shape, a body that could
//!   not be parsed, a missing handler, or broken configuration. These are
//!   returned to the caller unchanged and are never retried.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// A validation failure with optional per-field errors.
///
/// A validator produces a simple error (a message and a code). When a form
/// reports the outcome of a whole validation pass, the per-field errors are
/// collected into [`field_errors`](Self::field_errors).
///
/// # Examples
///
/// ```
/// use formwork_core::error::ValidationError;
///
/// let err = ValidationError::new("Email is required.", "required");
/// assert_eq!(err.to_string(), "Email is required.");
///
/// let form_err = ValidationError::for_field("email", err);
/// assert_eq!(form_err.to_string(), "email: Email is required.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the failure (e.g. "required", "invalid").
    pub code: String,
    /// Parameters used to build the message.
    pub params: BTreeMap<String, String>,
    /// Per-field validation errors, keyed by the field's HTML name.
    pub field_errors: BTreeMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: BTreeMap::new(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Creates a `ValidationError` with the generic `invalid` code.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(message, "invalid")
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: BTreeMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: BTreeMap::new(),
            field_errors,
        }
    }

    /// Wraps a single error as the error of one named field.
    pub fn for_field(field: impl Into<String>, error: Self) -> Self {
        let mut field_errors = BTreeMap::new();
        field_errors.insert(field.into(), vec![error]);
        Self::with_field_errors(field_errors)
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Merges the per-field errors of `other` into this error.
    pub fn merge(&mut self, other: Self) {
        for (field, errors) in other.field_errors {
            self.field_errors.entry(field).or_default().extend(errors);
        }
    }

    /// Returns the names of the fields that carry errors.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.field_errors.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut first = true;
            for (field, errors) in &self.field_errors {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The fatal error type for formwork.
///
/// Each variant maps to an HTTP status code via
/// [`FormworkError::status_code`] so that integrations can turn an error
/// into a response without inspecting it further.
#[derive(Error, Debug)]
pub enum FormworkError {
    // ── Protocol violations ──────────────────────────────────────────

    /// A request used a method the form engine cannot bind from.
    #[error("Cannot handle request method: {0}")]
    UnsupportedMethod(String),

    /// The value passed to `handle` is neither empty nor a mapping.
    #[error("Cannot handle type: {0}")]
    UnsupportedType(String),

    /// `handle` needed a handler that was not supplied and no `other`
    /// fallback exists.
    #[error("No handler registered for outcome: {0}")]
    MissingHandler(&'static str),

    // ── Input ────────────────────────────────────────────────────────

    /// The request body could not be parsed.
    #[error("Body parse error: {0}")]
    BodyParse(String),

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormworkError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `BodyParse`, `Validation` -> 400
    /// - `UnsupportedMethod` -> 405
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BodyParse(_) | Self::Validation(_) => 400,
            Self::UnsupportedMethod(_) => 405,
            Self::UnsupportedType(_)
            | Self::MissingHandler(_)
            | Self::ConfigurationError(_)
            | Self::IoError(_) => 500,
        }
    }
}

impl From<ValidationError> for FormworkError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, FormworkError>`.
pub type FormworkResult<T> = Result<T, FormworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_simple() {
        let err = ValidationError::new("This field is required.", "required");
        assert_eq!(err.to_string(), "This field is required.");
    }

    #[test]
    fn test_validation_error_display_field_errors() {
        let mut field_errors = BTreeMap::new();
        field_errors.insert(
            "email".to_string(),
            vec![ValidationError::invalid("Invalid email.")],
        );
        field_errors.insert(
            "age".to_string(),
            vec![ValidationError::invalid("Too young.")],
        );
        let err = ValidationError::with_field_errors(field_errors);
        assert_eq!(err.to_string(), "age: Too young.; email: Invalid email.");
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Too short.", "min_length").with_param("min", "8");
        assert_eq!(err.params.get("min").unwrap(), "8");
    }

    #[test]
    fn test_validation_error_merge() {
        let mut err = ValidationError::for_field("a", ValidationError::invalid("bad a"));
        err.merge(ValidationError::for_field("b", ValidationError::invalid("bad b")));
        err.merge(ValidationError::for_field("a", ValidationError::invalid("worse a")));
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(err.field_errors["a"].len(), 2);
    }

    #[test]
    fn test_formwork_error_status_codes() {
        assert_eq!(FormworkError::UnsupportedMethod("DELETE".into()).status_code(), 405);
        assert_eq!(FormworkError::UnsupportedType("string".into()).status_code(), 500);
        assert_eq!(FormworkError::MissingHandler("empty").status_code(), 500);
        assert_eq!(FormworkError::BodyParse("x".into()).status_code(), 400);
        assert_eq!(
            FormworkError::Validation(ValidationError::new("x", "y")).status_code(),
            400
        );
        assert_eq!(FormworkError::ConfigurationError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_formwork_error_display() {
        let err = FormworkError::UnsupportedMethod("DELETE".into());
        assert_eq!(err.to_string(), "Cannot handle request method: DELETE");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FormworkError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("file missing"));
    }
}
