//! JSON-Schema-style descriptor reflection.
//!
//! A shallow convenience for introspection and documentation; validation
//! itself never consults the descriptor.

use serde_json::{Map, Value};

use super::constraint::Constraint;
use super::types::{FieldType, RecordType};

impl RecordType {
    /// Returns a JSON-Schema-style descriptor of this record type.
    ///
    /// Properties are keyed the way raw input is keyed (alias where one is
    /// declared). Computed fields appear as read-only properties.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let key = field.lookup_key();
            let mut prop = type_descriptor(&field.field_type);

            for constraint in &field.constraints {
                apply_constraint(&mut prop, constraint);
            }
            if let Some(default) = &field.default {
                prop.insert("default".into(), default.clone());
            }
            if field.nullable {
                prop.insert("nullable".into(), Value::Bool(true));
            }
            if field.required {
                required.push(Value::String(key.to_string()));
            }

            properties.insert(key.to_string(), Value::Object(prop));
        }

        for computed in &self.computed_fields {
            let mut prop = Map::new();
            prop.insert("readOnly".into(), Value::Bool(true));
            properties.insert(computed.name().to_string(), Value::Object(prop));
        }

        let mut schema = Map::new();
        schema.insert("title".into(), Value::String(self.name.clone()));
        schema.insert("type".into(), Value::String("object".into()));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), Value::Array(required));
        Value::Object(schema)
    }
}

/// Base descriptor for a declared type
fn type_descriptor(field_type: &FieldType) -> Map<String, Value> {
    let mut prop = Map::new();
    match field_type {
        FieldType::String => {
            prop.insert("type".into(), Value::String("string".into()));
        }
        FieldType::Int => {
            prop.insert("type".into(), Value::String("integer".into()));
        }
        FieldType::Float => {
            prop.insert("type".into(), Value::String("number".into()));
        }
        FieldType::Bool => {
            prop.insert("type".into(), Value::String("boolean".into()));
        }
        FieldType::Email => {
            prop.insert("type".into(), Value::String("string".into()));
            prop.insert("format".into(), Value::String("email".into()));
        }
        FieldType::Url => {
            prop.insert("type".into(), Value::String("string".into()));
            prop.insert("format".into(), Value::String("uri".into()));
        }
        FieldType::Record { record } => {
            if let Value::Object(nested) = record.json_schema() {
                return nested;
            }
            // json_schema always returns an object
            prop.insert("type".into(), Value::String("object".into()));
        }
        FieldType::List { element } => {
            prop.insert("type".into(), Value::String("array".into()));
            prop.insert("items".into(), Value::Object(type_descriptor(element)));
        }
    }
    prop
}

/// Folds a constraint into the property descriptor
fn apply_constraint(prop: &mut Map<String, Value>, constraint: &Constraint) {
    match constraint {
        Constraint::Positive => {
            prop.insert("exclusiveMinimum".into(), Value::from(0));
        }
        Constraint::MinLength { min } => {
            prop.insert("minLength".into(), Value::from(*min));
        }
        Constraint::MaxLength { max } => {
            prop.insert("maxLength".into(), Value::from(*max));
        }
        Constraint::Pattern { pattern } => {
            prop.insert("pattern".into(), Value::String(pattern.clone()));
        }
        Constraint::MinItems { min } => {
            prop.insert("minItems".into(), Value::from(*min));
        }
        Constraint::MaxItems { max } => {
            prop.insert("maxItems".into(), Value::from(*max));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;
    use serde_json::json;

    #[test]
    fn test_basic_descriptor() {
        let record = RecordType::new(
            "users",
            vec![
                FieldDef::int("id"),
                FieldDef::string("name").default_value(json!("Subrata")),
            ],
        );

        let schema = record.json_schema();
        assert_eq!(schema["title"], "users");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["id"]["type"], "integer");
        assert_eq!(schema["properties"]["name"]["default"], "Subrata");
        assert_eq!(schema["required"], json!(["id"]));
    }

    #[test]
    fn test_constraints_reflected() {
        let record = RecordType::new(
            "restaurants",
            vec![
                FieldDef::int("number_of_seats").constraint(Constraint::Positive),
                FieldDef::list("employees", FieldType::String)
                    .constraint(Constraint::MinItems { min: 2 }),
            ],
        );

        let schema = record.json_schema();
        assert_eq!(
            schema["properties"]["number_of_seats"]["exclusiveMinimum"],
            0
        );
        assert_eq!(schema["properties"]["employees"]["minItems"], 2);
        assert_eq!(schema["properties"]["employees"]["items"]["type"], "string");
    }

    #[test]
    fn test_alias_keys_and_formats() {
        let record = RecordType::new(
            "owners",
            vec![
                FieldDef::string("name").alias("username"),
                FieldDef::email("email"),
                FieldDef::url("website"),
            ],
        );

        let schema = record.json_schema();
        assert!(schema["properties"].get("username").is_some());
        assert!(schema["properties"].get("name").is_none());
        assert_eq!(schema["properties"]["email"]["format"], "email");
        assert_eq!(schema["properties"]["website"]["format"], "uri");
        assert_eq!(schema["required"], json!(["username", "email", "website"]));
    }

    #[test]
    fn test_nested_record_descriptor() {
        let address = RecordType::new(
            "address",
            vec![FieldDef::string("city"), FieldDef::string("zip_code")],
        );
        let record = RecordType::new("users", vec![FieldDef::record("address", address)]);

        let schema = record.json_schema();
        let nested = &schema["properties"]["address"];
        assert_eq!(nested["type"], "object");
        assert_eq!(nested["properties"]["city"]["type"], "string");
    }

    #[test]
    fn test_computed_field_read_only() {
        let record = RecordType::new("people", vec![FieldDef::int("birth_year")])
            .computed("age", |_| json!(0));

        let schema = record.json_schema();
        assert_eq!(schema["properties"]["age"]["readOnly"], true);
    }
}
