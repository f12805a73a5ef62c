//! Constraints applied to a field value after type coercion.
//!
//! Constraints run in declaration order; the first failure short-circuits
//! the field with its message. Each rule is an explicit variant so the set
//! of accepted checks is closed and serializable.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single post-coercion check on a field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Constraint {
    /// Number must be strictly greater than zero
    Positive,
    /// String must have at least `min` characters
    MinLength { min: usize },
    /// String must have at most `max` characters
    MaxLength { max: usize },
    /// String must match the regular expression (search semantics)
    Pattern { pattern: String },
    /// List must have at least `min` elements
    MinItems { min: usize },
    /// List must have at most `max` elements
    MaxItems { max: usize },
}

impl Constraint {
    /// Create a pattern constraint
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Constraint::Pattern {
            pattern: pattern.into(),
        }
    }

    /// Checks a coerced value against this constraint.
    ///
    /// Returns the failure message on violation. A value of the wrong kind
    /// for the rule (e.g. `Positive` on a string) is a violation too; the
    /// declaration was inconsistent and silence would hide it.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Constraint::Positive => match value {
                Value::Number(n) => {
                    let positive = n
                        .as_i64()
                        .map(|i| i > 0)
                        .or_else(|| n.as_u64().map(|u| u > 0))
                        .or_else(|| n.as_f64().map(|f| f > 0.0))
                        .unwrap_or(false);
                    if positive {
                        Ok(())
                    } else {
                        Err(format!("must be greater than 0, got {}", n))
                    }
                }
                _ => Err("positive constraint applies to numbers".into()),
            },
            Constraint::MinLength { min } => match value {
                Value::String(s) => {
                    let len = s.chars().count();
                    if len >= *min {
                        Ok(())
                    } else {
                        Err(format!("must be at least {} characters, got {}", min, len))
                    }
                }
                _ => Err("min_length constraint applies to strings".into()),
            },
            Constraint::MaxLength { max } => match value {
                Value::String(s) => {
                    let len = s.chars().count();
                    if len <= *max {
                        Ok(())
                    } else {
                        Err(format!("must be at most {} characters, got {}", max, len))
                    }
                }
                _ => Err("max_length constraint applies to strings".into()),
            },
            Constraint::Pattern { pattern } => match value {
                Value::String(s) => {
                    // Compilability is checked once at declaration time, so
                    // a failure here means the constraint never saw
                    // validate_structure.
                    let re = Regex::new(pattern)
                        .map_err(|e| format!("pattern '{}' does not compile: {}", pattern, e))?;
                    if re.is_match(s) {
                        Ok(())
                    } else {
                        Err(format!("must match pattern '{}'", pattern))
                    }
                }
                _ => Err("pattern constraint applies to strings".into()),
            },
            Constraint::MinItems { min } => match value {
                Value::Array(items) => {
                    if items.len() >= *min {
                        Ok(())
                    } else {
                        Err(format!(
                            "must have at least {} items, got {}",
                            min,
                            items.len()
                        ))
                    }
                }
                _ => Err("min_items constraint applies to lists".into()),
            },
            Constraint::MaxItems { max } => match value {
                Value::Array(items) => {
                    if items.len() <= *max {
                        Ok(())
                    } else {
                        Err(format!(
                            "must have at most {} items, got {}",
                            max,
                            items.len()
                        ))
                    }
                }
                _ => Err("max_items constraint applies to lists".into()),
            },
        }
    }
}
