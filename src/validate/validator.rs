//! Record validation: raw JSON input against a record type declaration.
//!
//! Validation order:
//! 1. The raw input must be a JSON object.
//! 2. Before hooks run on the raw map; the first violation aborts.
//! 3. Fields validate in declaration order: lookup (alias where declared),
//!    presence/default handling, coercion, then constraints. Field errors
//!    accumulate; validation continues with the remaining fields.
//! 4. Any accumulated errors fail the whole call. No partial instance.
//! 5. After hooks run on the constructed values; the first violation aborts.
//!
//! Validation is deterministic and never mutates its input.

use std::collections::BTreeSet;

use serde_json::Value;

use super::coerce::{coerce_value, json_type_name};
use super::errors::{FieldError, FieldPath, ValidationError};
use super::hooks::{HookViolation, ValueMap};
use crate::instance::Instance;
use crate::schema::{RecordRegistry, RecordType};

impl RecordType {
    /// Validates raw input against this record type.
    ///
    /// Returns a validated [`Instance`], or the full aggregate of failures.
    pub fn validate(&self, raw: &Value) -> Result<Instance, ValidationError> {
        let (values, fields_set) = validate_parts(self, raw)?;
        Ok(Instance::new(self.clone(), values, fields_set))
    }
}

/// Core of validation, shared with nested-record coercion.
///
/// Returns the constructed value map (declaration order) and the set of
/// field names the caller explicitly supplied.
pub(crate) fn validate_parts(
    record: &RecordType,
    raw: &Value,
) -> Result<(ValueMap, BTreeSet<String>), ValidationError> {
    let raw_map = match raw.as_object() {
        Some(map) => map,
        None => {
            return Err(ValidationError::single(
                &record.name,
                FieldError::type_mismatch(FieldPath::root(), "object", json_type_name(raw)),
            ));
        }
    };

    for hook in record.before_hooks() {
        if let Err(violation) = hook(raw_map) {
            return Err(hook_failure(record, violation, true));
        }
    }

    let mut values = ValueMap::new();
    let mut fields_set = BTreeSet::new();
    let mut errors = Vec::new();

    for field in &record.fields {
        let path = FieldPath::field(&field.name);

        match raw_map.get(field.lookup_key()) {
            Some(value) if value.is_null() && field.nullable => {
                values.insert(field.name.clone(), Value::Null);
                fields_set.insert(field.name.clone());
            }
            Some(value) => match coerce_value(value, &field.field_type, &path) {
                Ok(coerced) => {
                    // First failing constraint short-circuits this field
                    match field
                        .constraints
                        .iter()
                        .find_map(|c| c.check(&coerced).err())
                    {
                        Some(message) => errors.push(FieldError::constraint(path, message)),
                        None => {
                            values.insert(field.name.clone(), coerced);
                            fields_set.insert(field.name.clone());
                        }
                    }
                }
                Err(mut errs) => errors.append(&mut errs),
            },
            None => {
                if field.required {
                    errors.push(FieldError::missing_field(path));
                } else if let Some(factory) = &field.default_factory {
                    // Invoked per call so generated defaults stay fresh
                    values.insert(field.name.clone(), factory());
                } else if let Some(default) = &field.default {
                    values.insert(field.name.clone(), default.clone());
                } else {
                    // Structure validation guarantees the field is nullable
                    values.insert(field.name.clone(), Value::Null);
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError::new(&record.name, errors));
    }

    for hook in record.after_hooks() {
        if let Err(violation) = hook(&values) {
            return Err(hook_failure(record, violation, false));
        }
    }

    Ok((values, fields_set))
}

/// Wraps a hook violation as the aggregate's sole error.
fn hook_failure(record: &RecordType, violation: HookViolation, before: bool) -> ValidationError {
    let path = match violation.field() {
        Some(field) => FieldPath::field(field),
        None => FieldPath::root(),
    };
    let error = if before {
        FieldError::disallowed_input(path, violation.message())
    } else {
        FieldError::cross_field(path, violation.message())
    };
    ValidationError::single(&record.name, error)
}

/// Validator that resolves record types by name through a registry.
pub struct RecordValidator<'a> {
    registry: &'a RecordRegistry,
}

impl<'a> RecordValidator<'a> {
    /// Creates a validator backed by the given registry.
    pub fn new(registry: &'a RecordRegistry) -> Self {
        Self { registry }
    }

    /// Validates raw input against the named record type.
    ///
    /// An unregistered name is reported as a [`crate::schema::SchemaError`];
    /// validation failures come back as the usual aggregate.
    pub fn validate(&self, record_name: &str, raw: &Value) -> Result<Instance, ValidateError> {
        let record = self
            .registry
            .get(record_name)
            .ok_or_else(|| crate::schema::SchemaError::UnknownRecord(record_name.to_string()))?;
        Ok(record.validate(raw)?)
    }
}

/// Failure of a registry-resolved validation call
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidateError {
    /// The record type name is not registered
    #[error(transparent)]
    Schema(#[from] crate::schema::SchemaError),
    /// The input failed validation
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Constraint, FieldDef};
    use crate::validate::ErrorKind;
    use serde_json::json;

    fn user_record() -> RecordType {
        RecordType::new(
            "users",
            vec![
                FieldDef::int("id"),
                FieldDef::string("name").default_value(json!("Subrata")),
            ],
        )
    }

    #[test]
    fn test_valid_input_passes() {
        let instance = user_record().validate(&json!({"id": 1})).unwrap();
        assert_eq!(instance.get("id"), Some(&json!(1)));
        assert_eq!(instance.get("name"), Some(&json!("Subrata")));
    }

    #[test]
    fn test_supplied_fields_tracked() {
        let record = user_record();

        let defaulted = record.validate(&json!({"id": 1})).unwrap();
        assert!(defaulted.was_supplied("id"));
        assert!(!defaulted.was_supplied("name"));

        let supplied = record.validate(&json!({"id": 1, "name": "Suvo"})).unwrap();
        assert!(supplied.was_supplied("name"));
    }

    #[test]
    fn test_integer_string_coerced() {
        let instance = user_record().validate(&json!({"id": "123"})).unwrap();
        assert_eq!(instance.get("id"), Some(&json!(123)));
    }

    #[test]
    fn test_missing_required_field_recorded() {
        let err = user_record().validate(&json!({})).unwrap_err();
        assert_eq!(err.error_count(), 1);
        assert_eq!(err.errors()[0].kind, ErrorKind::MissingField);
        assert_eq!(err.errors()[0].path.to_string(), "id");
    }

    #[test]
    fn test_errors_aggregate_across_fields() {
        let record = RecordType::new(
            "users",
            vec![
                FieldDef::int("id"),
                FieldDef::string("name"),
                FieldDef::email("email"),
            ],
        );

        let err = record
            .validate(&json!({"id": "abc", "email": "nope"}))
            .unwrap_err();

        // id mismatch + name missing + email format, all reported at once
        assert_eq!(err.error_count(), 3);
        assert_eq!(err.of_kind(ErrorKind::TypeMismatch).count(), 1);
        assert_eq!(err.of_kind(ErrorKind::MissingField).count(), 1);
        assert_eq!(err.of_kind(ErrorKind::Format).count(), 1);
    }

    #[test]
    fn test_non_object_input_rejected() {
        let err = user_record().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.errors()[0].path.to_string(), "$root");
        assert_eq!(err.errors()[0].kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_undeclared_keys_ignored() {
        let instance = user_record()
            .validate(&json!({"id": 1, "unexpected": "extra"}))
            .unwrap();
        assert!(instance.get("unexpected").is_none());
    }

    #[test]
    fn test_constraint_order_and_short_circuit() {
        let record = RecordType::new(
            "users",
            vec![FieldDef::string("name")
                .constraint(Constraint::MinLength { min: 20 })
                .constraint(Constraint::pattern("^[0-9]+$"))],
        );

        let err = record.validate(&json!({"name": "short"})).unwrap_err();
        // Only the first failing constraint is reported
        assert_eq!(err.error_count(), 1);
        assert!(err.errors()[0].message.contains("at least 20 characters"));
    }

    #[test]
    fn test_default_factory_fresh_per_call() {
        let record = RecordType::new("users", vec![FieldDef::string("id").default_uuid()]);

        let first = record.validate(&json!({})).unwrap();
        let second = record.validate(&json!({})).unwrap();

        assert_ne!(first.get("id"), second.get("id"));
        assert!(!first.was_supplied("id"));
        assert!(!second.was_supplied("id"));
    }

    #[test]
    fn test_nullable_field_defaults_to_null() {
        let record = RecordType::new(
            "foods",
            vec![
                FieldDef::string("name"),
                FieldDef::list("ingredients", crate::schema::FieldType::String).nullable(),
            ],
        );

        let omitted = record.validate(&json!({"name": "Cheese Burger"})).unwrap();
        assert_eq!(omitted.get("ingredients"), Some(&json!(null)));
        assert!(!omitted.was_supplied("ingredients"));

        let explicit = record
            .validate(&json!({"name": "Cheese Burger", "ingredients": null}))
            .unwrap();
        assert!(explicit.was_supplied("ingredients"));
    }

    #[test]
    fn test_alias_lookup_is_exclusive() {
        let record = RecordType::new(
            "users",
            vec![FieldDef::string("name").alias("username")],
        );

        let instance = record.validate(&json!({"username": "Subrata Mondal"})).unwrap();
        assert_eq!(instance.get("name"), Some(&json!("Subrata Mondal")));

        // The canonical name is not consulted once an alias is declared
        let err = record.validate(&json!({"name": "Subrata Mondal"})).unwrap_err();
        assert_eq!(err.errors()[0].kind, ErrorKind::MissingField);
    }

    #[test]
    fn test_before_hook_aborts_ahead_of_field_errors() {
        let record = RecordType::new("owners", vec![FieldDef::int("id")]).before_hook(|raw| {
            if raw.contains_key("password") {
                return Err(HookViolation::new("password should not be included"));
            }
            Ok(())
        });

        // "id" is also invalid here, but the hook violation is reported alone
        let err = record
            .validate(&json!({"password": "x", "id": "abc"}))
            .unwrap_err();
        assert_eq!(err.error_count(), 1);
        assert_eq!(err.errors()[0].kind, ErrorKind::DisallowedInput);
    }

    #[test]
    fn test_after_hook_cross_field_check() {
        let record = RecordType::new(
            "owners",
            vec![FieldDef::string("name"), FieldDef::email("email")],
        )
        .after_hook(|values| {
            let name = values["name"].as_str().unwrap_or("");
            if !name.contains(' ') {
                return Err(HookViolation::on_field(
                    "name",
                    "owner name must contain a space",
                ));
            }
            Ok(())
        });

        let ok = record.validate(&json!({"name": "Subrata Mondal", "email": "a@b.com"}));
        assert!(ok.is_ok());

        let err = record
            .validate(&json!({"name": "Subrata", "email": "a@b.com"}))
            .unwrap_err();
        assert_eq!(err.error_count(), 1);
        assert_eq!(err.errors()[0].kind, ErrorKind::CrossField);
        assert_eq!(err.errors()[0].path.to_string(), "name");
    }

    #[test]
    fn test_after_hooks_skip_when_field_errors_exist() {
        let record = RecordType::new("owners", vec![FieldDef::string("name")]).after_hook(|_| {
            Err(HookViolation::new("should never run"))
        });

        let err = record.validate(&json!({})).unwrap_err();
        assert_eq!(err.errors()[0].kind, ErrorKind::MissingField);
    }

    #[test]
    fn test_registry_backed_validator() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut registry = RecordRegistry::new(tmp.path());
        registry.register(user_record()).unwrap();

        let validator = RecordValidator::new(&registry);
        assert!(validator.validate("users", &json!({"id": 1})).is_ok());

        let err = validator.validate("nonexistent", &json!({})).unwrap_err();
        assert!(matches!(err, ValidateError::Schema(_)));

        let err = validator.validate("users", &json!({})).unwrap_err();
        assert!(matches!(err, ValidateError::Invalid(_)));
    }
}
