//! Input validation for veridoc
//!
//! Turns raw, loosely typed JSON into validated instances:
//! - coercion over explicit per-type allow-lists
//! - constraints in declaration order
//! - before/after hooks with abort-alone semantics
//! - per-field errors aggregated across the whole record

mod coerce;
mod errors;
mod hooks;
mod validator;

pub use errors::{ErrorKind, FieldError, FieldPath, PathSegment, ValidationError};
pub use hooks::{AfterHook, BeforeHook, ComputedField, HookViolation, ValueMap};
pub use validator::{RecordValidator, ValidateError};
