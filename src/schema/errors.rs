//! Errors raised while declaring or registering record types.
//!
//! These cover mistakes in the shape declaration itself (duplicate names,
//! an optional field with no way to produce a value, an uncompilable
//! pattern) and registry misuse. Failures while validating *input* against
//! a well-formed record type live in `validate::errors`.

use thiserror::Error;

/// Result type for declaration and registry operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Declaration and registry errors
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("record '{record}': duplicate field name '{field}'")]
    DuplicateField { record: String, field: String },

    #[error("record '{record}': lookup key '{key}' is used by more than one field")]
    DuplicateKey { record: String, key: String },

    #[error(
        "record '{record}': optional field '{field}' must declare a default value, \
         a default factory, or be nullable"
    )]
    MissingDefault { record: String, field: String },

    #[error("record '{record}': field '{field}' declares both a default value and a default factory")]
    ConflictingDefaults { record: String, field: String },

    #[error("record '{record}': field '{field}' pattern '{pattern}' does not compile: {reason}")]
    InvalidPattern {
        record: String,
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("record '{0}' is already registered")]
    DuplicateRecord(String),

    #[error("record '{0}' is not registered")]
    UnknownRecord(String),

    #[error("malformed record file '{path}': {reason}")]
    MalformedFile { path: String, reason: String },
}

impl SchemaError {
    /// Create a malformed file error
    pub fn malformed_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::MalformedFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
