//! Record type declarations for veridoc
//!
//! A record type is an ordered set of field declarations: declared type,
//! default policy, optional alias, and constraints. Declarations are
//! validated once, at construction or registration time; input validation
//! against them lives in the `validate` module.

mod constraint;
mod errors;
mod json_schema;
mod registry;
mod types;

pub use constraint::Constraint;
pub use errors::{SchemaError, SchemaResult};
pub use registry::RecordRegistry;
pub use types::{DefaultFactory, FieldDef, FieldType, RecordType};
