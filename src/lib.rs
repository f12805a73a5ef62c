//! veridoc - A strict, declarative record validation library
//!
//! Declare a typed record shape, validate loosely typed input against it,
//! and get back an immutable, deterministically ordered instance or the
//! full list of field errors.

pub mod instance;
pub mod schema;
pub mod validate;

pub use instance::Instance;
pub use schema::{
    Constraint, DefaultFactory, FieldDef, FieldType, RecordRegistry, RecordType, SchemaError,
    SchemaResult,
};
pub use validate::{
    ComputedField, ErrorKind, FieldError, FieldPath, HookViolation, PathSegment, RecordValidator,
    ValidateError, ValidationError, ValueMap,
};
