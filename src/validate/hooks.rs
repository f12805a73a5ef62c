//! Whole-record validation extension points.
//!
//! Hooks are explicit ordered lists of functions attached to a record type
//! at construction and invoked in fixed order: before hooks see the raw
//! input map ahead of any per-field work, after hooks see the constructed
//! value map once every field validated. The first violation aborts
//! construction and is reported alone.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Ordered JSON object map, the shape hooks and computed fields operate on
pub type ValueMap = serde_json::Map<String, Value>;

/// A hook's rejection of the record under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookViolation {
    field: Option<String>,
    message: String,
}

impl HookViolation {
    /// Reject the record as a whole
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Reject the record, pointing at the offending field
    pub fn on_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// The field the violation points at, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// The rejection message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Runs over the raw input map before any per-field coercion
pub type BeforeHook = Arc<dyn Fn(&ValueMap) -> Result<(), HookViolation> + Send + Sync>;

/// Runs over the constructed value map after per-field validation
pub type AfterHook = Arc<dyn Fn(&ValueMap) -> Result<(), HookViolation> + Send + Sync>;

/// A derived value appended after declared fields during serialization
#[derive(Clone)]
pub struct ComputedField {
    name: String,
    compute: Arc<dyn Fn(&ValueMap) -> Value + Send + Sync>,
}

impl ComputedField {
    /// Create a computed field
    pub fn new(
        name: impl Into<String>,
        compute: impl Fn(&ValueMap) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            compute: Arc::new(compute),
        }
    }

    /// The computed field's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derives the value from the validated value map
    pub fn compute(&self, values: &ValueMap) -> Value {
        (self.compute)(values)
    }
}

impl fmt::Debug for ComputedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedField")
            .field("name", &self.name)
            .finish()
    }
}
