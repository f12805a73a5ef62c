//! Per-type coercion of raw values.
//!
//! Each declared type accepts an explicit allow-list of input shapes and
//! nothing else, so no unintended input is silently accepted:
//! - int: JSON integer, or a string that parses exactly as i64
//! - float: any JSON number, or a numeric string
//! - bool: JSON bool, or the strings "true"/"false"
//! - string: JSON string only
//! - email/url: JSON string, then a well-formedness check (format error)
//! - record/list: object/array, validated recursively with path prefixes

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Number, Value};
use url::Url;

use super::errors::{FieldError, FieldPath};
use super::validator::validate_parts;
use crate::schema::FieldType;

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    // Well-formedness only: local part, '@', dotted domain.
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").unwrap()
    })
}

fn mismatch(path: &FieldPath, expected: &str, raw: &Value) -> Vec<FieldError> {
    vec![FieldError::type_mismatch(
        path.clone(),
        expected,
        json_type_name(raw),
    )]
}

/// Coerces one raw value to its declared type.
///
/// Returns the normalized value, or every error found beneath `path`
/// (nested records and lists can contribute more than one).
pub(crate) fn coerce_value(
    raw: &Value,
    field_type: &FieldType,
    path: &FieldPath,
) -> Result<Value, Vec<FieldError>> {
    match field_type {
        FieldType::String => match raw {
            Value::String(_) => Ok(raw.clone()),
            _ => Err(mismatch(path, "string", raw)),
        },
        FieldType::Int => coerce_int(raw, path),
        FieldType::Float => coerce_float(raw, path),
        FieldType::Bool => match raw {
            Value::Bool(_) => Ok(raw.clone()),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(mismatch(path, "bool", raw)),
        },
        FieldType::Email => match raw {
            Value::String(s) => {
                if email_regex().is_match(s) {
                    Ok(raw.clone())
                } else {
                    Err(vec![FieldError::format(
                        path.clone(),
                        format!("'{}' is not a well-formed email address", s),
                    )])
                }
            }
            _ => Err(mismatch(path, "email", raw)),
        },
        FieldType::Url => match raw {
            Value::String(s) => match Url::parse(s) {
                Ok(_) => Ok(raw.clone()),
                Err(e) => Err(vec![FieldError::format(
                    path.clone(),
                    format!("'{}' is not a valid absolute URL: {}", s, e),
                )]),
            },
            _ => Err(mismatch(path, "url", raw)),
        },
        FieldType::Record { record } => {
            if !raw.is_object() {
                return Err(mismatch(path, "record", raw));
            }
            match validate_parts(record, raw) {
                Ok((values, _fields_set)) => Ok(Value::Object(values)),
                Err(err) => {
                    let mut errors = err.into_errors();
                    for error in &mut errors {
                        error.path.prefix_with(path);
                    }
                    Err(errors)
                }
            }
        }
        FieldType::List { element } => {
            let items = match raw.as_array() {
                Some(items) => items,
                None => return Err(mismatch(path, "list", raw)),
            };

            let mut coerced = Vec::with_capacity(items.len());
            let mut errors = Vec::new();
            for (i, item) in items.iter().enumerate() {
                match coerce_value(item, element, &path.index(i)) {
                    Ok(value) => coerced.push(value),
                    Err(mut errs) => errors.append(&mut errs),
                }
            }

            if errors.is_empty() {
                Ok(Value::Array(coerced))
            } else {
                Err(errors)
            }
        }
    }
}

fn coerce_int(raw: &Value, path: &FieldPath) -> Result<Value, Vec<FieldError>> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(Number::from(i)))
            } else if n.is_u64() {
                Err(vec![FieldError::type_mismatch(
                    path.clone(),
                    "int",
                    "out-of-range integer",
                )])
            } else {
                // Floats never silently truncate to int
                Err(mismatch(path, "int", raw))
            }
        }
        Value::String(s) => match s.parse::<i64>() {
            Ok(i) => Ok(Value::Number(Number::from(i))),
            Err(_) => Err(mismatch(path, "int", raw)),
        },
        _ => Err(mismatch(path, "int", raw)),
    }
}

fn coerce_float(raw: &Value, path: &FieldPath) -> Result<Value, Vec<FieldError>> {
    match raw {
        // Integers are acceptable as floats, kept as given
        Value::Number(_) => Ok(raw.clone()),
        Value::String(s) => match s.parse::<f64>() {
            Ok(f) if f.is_finite() => match Number::from_f64(f) {
                Some(n) => Ok(Value::Number(n)),
                None => Err(mismatch(path, "float", raw)),
            },
            _ => Err(mismatch(path, "float", raw)),
        },
        _ => Err(mismatch(path, "float", raw)),
    }
}
