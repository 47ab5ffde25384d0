//! Error types for schema compilation and validation
//!
//! Rule violations and compile/load faults are separate types: a
//! violation is an expected outcome of checking caller input, a fault
//! means the schema itself could not be built.

use thiserror::Error;

/// Result type for schema compilation and loading.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for validation calls.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Faults raised while compiling or loading schema declarations.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A pattern source failed to compile as a regular expression.
    #[error("field '{field}' has an invalid pattern: {source}")]
    InvalidPattern { field: String, source: regex::Error },

    /// A schema name was registered twice.
    #[error("schema '{0}' is already registered")]
    DuplicateSchema(String),

    /// A declaration file could not be read.
    #[error("failed to read '{path}': {reason}")]
    Io { path: String, reason: String },

    /// A declaration file could not be parsed.
    #[error("malformed schema file '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

/// A rule violation detected during validation.
///
/// The first violation aborts the whole call; there is no aggregation
/// and no partial result. Every variant carries the offending field
/// path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field '{0}' is missing")]
    MissingField(String),

    #[error("field '{0}' is not allowed")]
    IllegalField(String),

    #[error("field '{field}' has wrong type, {expected} expected")]
    WrongType { field: String, expected: String },

    #[error("field '{0}' is too small")]
    MinValueDroppedBelow(String),

    #[error("field '{0}' is too large")]
    MaxValueExceeded(String),

    #[error("field '{0}' is too short")]
    MinLengthDroppedBelow(String),

    #[error("field '{0}' is too long")]
    MaxLengthExceeded(String),

    #[error("field '{0}' has wrong format")]
    WrongFormat(String),
}

impl ValidationError {
    /// Returns the stable kind string for callers that dispatch on it.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing-field",
            ValidationError::IllegalField(_) => "illegal-field",
            ValidationError::WrongType { .. } => "wrong-type",
            ValidationError::MinValueDroppedBelow(_) => "min-value-dropped-below",
            ValidationError::MaxValueExceeded(_) => "max-value-exceeded",
            ValidationError::MinLengthDroppedBelow(_) => "min-length-dropped-below",
            ValidationError::MaxLengthExceeded(_) => "max-length-exceeded",
            ValidationError::WrongFormat(_) => "wrong-format",
        }
    }

    /// Returns the offending field path.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField(field)
            | ValidationError::IllegalField(field)
            | ValidationError::MinValueDroppedBelow(field)
            | ValidationError::MaxValueExceeded(field)
            | ValidationError::MinLengthDroppedBelow(field)
            | ValidationError::MaxLengthExceeded(field)
            | ValidationError::WrongFormat(field) => field,
            ValidationError::WrongType { field, .. } => field,
        }
    }
}
