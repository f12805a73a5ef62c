//! Record type and field declarations.
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - email: string checked for email well-formedness
//! - url: string checked to parse as an absolute URL
//! - record: nested record with its own field declarations
//! - list: homogeneous list with an element type
//!
//! Field order is declaration order and drives serialization order.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::constraint::Constraint;
use super::errors::{SchemaError, SchemaResult};
use crate::validate::{AfterHook, BeforeHook, ComputedField, HookViolation, ValueMap};

/// Produces a fresh default value, invoked once per validation call
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Declared type of a single field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// String checked against an email well-formedness pattern
    Email,
    /// String checked to parse as an absolute URL
    Url,
    /// Nested record with its own declarations (boxed to allow recursion)
    Record {
        /// The nested record type
        record: Box<RecordType>,
    },
    /// Homogeneous list with a single element type
    List {
        /// Element type (boxed to allow recursive types)
        element: Box<FieldType>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Record { .. } => "record",
            FieldType::List { .. } => "list",
        }
    }
}

/// Declaration of one named field
#[derive(Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Canonical field name, unique within the record
    pub name: String,
    /// Declared data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the field must be supplied by the caller
    pub required: bool,
    /// Whether an explicit or defaulted null is acceptable
    #[serde(default)]
    pub nullable: bool,
    /// Default value applied when the field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Default factory, invoked per validation call. Code, not data:
    /// skipped by serde.
    #[serde(skip)]
    pub default_factory: Option<DefaultFactory>,
    /// External name used to look the field up in raw input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Post-coercion checks, applied in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl FieldDef {
    /// Create a required field of the given type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            nullable: false,
            default: None,
            default_factory: None,
            alias: None,
            constraints: Vec::new(),
        }
    }

    /// Create a required string field
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    /// Create a required int field
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    /// Create a required float field
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    /// Create a required bool field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    /// Create a required email field
    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Email)
    }

    /// Create a required URL field
    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Url)
    }

    /// Create a required nested record field
    pub fn record(name: impl Into<String>, record: RecordType) -> Self {
        Self::new(
            name,
            FieldType::Record {
                record: Box::new(record),
            },
        )
    }

    /// Create a required list field with the given element type
    pub fn list(name: impl Into<String>, element: FieldType) -> Self {
        Self::new(
            name,
            FieldType::List {
                element: Box::new(element),
            },
        )
    }

    /// Sets the external name used to look the field up in raw input.
    ///
    /// When an alias is declared, raw input is read through the alias only.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Appends a constraint. Constraints run in the order they were added.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Makes the field optional with a default value
    pub fn default_value(mut self, default: Value) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }

    /// Makes the field optional with a default factory.
    ///
    /// The factory runs once per validation call, never cached, so defaults
    /// that must be fresh per instance (generated identifiers) stay fresh.
    pub fn default_factory(mut self, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.required = false;
        self.default_factory = Some(Arc::new(factory));
        self
    }

    /// Makes the field optional with a fresh uuid-v4 hex string default
    pub fn default_uuid(self) -> Self {
        self.default_factory(|| Value::String(Uuid::new_v4().simple().to_string()))
    }

    /// Makes the field optional and nullable; absent values default to null
    pub fn nullable(mut self) -> Self {
        self.required = false;
        self.nullable = true;
        self
    }

    /// The key used to look this field up in raw input
    pub fn lookup_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("nullable", &self.nullable)
            .field("default", &self.default)
            .field(
                "default_factory",
                &self.default_factory.as_ref().map(|_| "<factory>"),
            )
            .field("alias", &self.alias)
            .field("constraints", &self.constraints)
            .finish()
    }
}

/// A named, ordered record shape
#[derive(Clone, Serialize, Deserialize)]
pub struct RecordType {
    /// Record type name
    pub name: String,
    /// Field declarations, in declaration order
    pub fields: Vec<FieldDef>,
    /// Hooks over the raw input, run before any per-field work
    #[serde(skip)]
    pub(crate) before_hooks: Vec<BeforeHook>,
    /// Hooks over the constructed values, run after per-field validation
    #[serde(skip)]
    pub(crate) after_hooks: Vec<AfterHook>,
    /// Derived values appended during serialization
    #[serde(skip)]
    pub(crate) computed_fields: Vec<ComputedField>,
}

impl RecordType {
    /// Create a new record type
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
            before_hooks: Vec::new(),
            after_hooks: Vec::new(),
            computed_fields: Vec::new(),
        }
    }

    /// Registers a hook over the raw input map, run before any per-field
    /// coercion. Hooks run in registration order; the first violation
    /// aborts validation.
    pub fn before_hook(
        mut self,
        hook: impl Fn(&ValueMap) -> Result<(), HookViolation> + Send + Sync + 'static,
    ) -> Self {
        self.before_hooks.push(Arc::new(hook));
        self
    }

    /// Registers a hook over the constructed value map, run after all
    /// per-field validation succeeded. Used for cross-field invariants.
    pub fn after_hook(
        mut self,
        hook: impl Fn(&ValueMap) -> Result<(), HookViolation> + Send + Sync + 'static,
    ) -> Self {
        self.after_hooks.push(Arc::new(hook));
        self
    }

    /// Registers a computed field, derived from the validated values and
    /// appended after declared fields during serialization.
    pub fn computed(
        mut self,
        name: impl Into<String>,
        compute: impl Fn(&ValueMap) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.computed_fields.push(ComputedField::new(name, compute));
        self
    }

    /// Looks up a field declaration by canonical name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Registered before hooks
    pub fn before_hooks(&self) -> &[BeforeHook] {
        &self.before_hooks
    }

    /// Registered after hooks
    pub fn after_hooks(&self) -> &[AfterHook] {
        &self.after_hooks
    }

    /// Registered computed fields
    pub fn computed_fields(&self) -> &[ComputedField] {
        &self.computed_fields
    }

    /// Validates the declaration itself (not input against it).
    ///
    /// Checks, recursively through nested records:
    /// - field names are unique
    /// - lookup keys (alias where declared, else name) are unique
    /// - optional fields can produce a value (default, factory, or nullable)
    /// - no field declares both a default value and a default factory
    /// - pattern constraints compile
    pub fn validate_structure(&self) -> SchemaResult<()> {
        let mut names = HashSet::new();
        let mut keys = HashSet::new();

        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    record: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if !keys.insert(field.lookup_key()) {
                return Err(SchemaError::DuplicateKey {
                    record: self.name.clone(),
                    key: field.lookup_key().to_string(),
                });
            }

            if !field.required {
                if field.default.is_some() && field.default_factory.is_some() {
                    return Err(SchemaError::ConflictingDefaults {
                        record: self.name.clone(),
                        field: field.name.clone(),
                    });
                }
                if field.default.is_none() && field.default_factory.is_none() && !field.nullable {
                    return Err(SchemaError::MissingDefault {
                        record: self.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }

            for constraint in &field.constraints {
                if let Constraint::Pattern { pattern } = constraint {
                    Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                        record: self.name.clone(),
                        field: field.name.clone(),
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })?;
                }
            }

            validate_nested(&field.field_type)?;
        }

        Ok(())
    }
}

/// Recurses into nested record declarations
fn validate_nested(field_type: &FieldType) -> SchemaResult<()> {
    match field_type {
        FieldType::Record { record } => record.validate_structure(),
        FieldType::List { element } => validate_nested(element),
        _ => Ok(()),
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("before_hooks", &self.before_hooks.len())
            .field("after_hooks", &self.after_hooks.len())
            .field("computed_fields", &self.computed_fields.len())
            .finish()
    }
}
