//! Structural validation of module data
//!
//! Walks a [`SchemaNode`] tree alongside a JSON value and stops at the first
//! failure. The failing location is reported as a field path such as
//! `name`, `dicom_tags.rows` or `pixel_spacing[1]`.

use super::definition::{SchemaDefinition, SchemaNode, SchemaType};
use super::registry::SchemaRegistry;
use crate::domain::{FieldMap, Result, UmdfError};
use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use std::sync::Arc;

/// Path shown when the root value itself fails
const ROOT_PATH: &str = "$";

/// Validates data against schemas held by a registry
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    registry: Arc<SchemaRegistry>,
}

impl SchemaValidator {
    /// Creates a validator over `registry`
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Validates `data` against the schema registered as `schema_id`
    ///
    /// # Errors
    ///
    /// - [`UmdfError::UnknownSchema`] if no such schema is registered
    /// - [`UmdfError::SchemaViolation`] carrying the first failing path
    pub fn validate(&self, schema_id: &str, data: &Value) -> Result<()> {
        let definition = self
            .registry
            .get(schema_id)
            .ok_or_else(|| UmdfError::UnknownSchema(schema_id.to_string()))?;
        validate_value(&definition, data)
    }

    /// Returns the registry this validator reads from
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }
}

/// Validates a JSON value against a definition
pub fn validate_value(definition: &SchemaDefinition, data: &Value) -> Result<()> {
    check_node(&definition.root, data, "")
}

/// Validates a module payload against a definition
pub fn validate_fields(definition: &SchemaDefinition, data: &FieldMap) -> Result<()> {
    validate_value(definition, &Value::Object(data.clone()))
}

fn field_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

fn index_path(parent: &str, index: usize) -> String {
    if parent.is_empty() {
        format!("{ROOT_PATH}[{index}]")
    } else {
        format!("{parent}[{index}]")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        ROOT_PATH
    } else {
        path
    }
}

fn type_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn matches_type(kind: SchemaType, value: &Value) -> bool {
    match kind {
        SchemaType::Object => value.is_object(),
        SchemaType::Array => value.is_array(),
        SchemaType::String => value.is_string(),
        SchemaType::Boolean => value.is_boolean(),
        SchemaType::Null => value.is_null(),
        SchemaType::Number => value.is_number(),
        SchemaType::Integer => match value {
            Value::Number(n) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        },
    }
}

fn check_format(format: &str, value: &str, path: &str) -> Result<()> {
    let valid = match format {
        "date" => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        "date-time" => DateTime::parse_from_rfc3339(value).is_ok(),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(UmdfError::violation(
            display_path(path),
            format!("'{value}' is not a valid {format}"),
        ))
    }
}

fn check_node(node: &SchemaNode, value: &Value, path: &str) -> Result<()> {
    if let Some(kind) = node.kind {
        if !matches_type(kind, value) {
            return Err(UmdfError::violation(
                display_path(path),
                format!("expected {kind}, found {}", type_of(value)),
            ));
        }
    }

    if let Some(allowed) = &node.allowed {
        if !allowed.contains(value) {
            return Err(UmdfError::violation(
                display_path(path),
                format!("{value} is not one of the allowed values"),
            ));
        }
    }

    match value {
        Value::String(s) => {
            if let Some(format) = &node.format {
                check_format(format, s, path)?;
            }
        }
        Value::Object(fields) => {
            for name in &node.required {
                if !fields.contains_key(name) {
                    return Err(UmdfError::violation(
                        field_path(path, name),
                        "required field is missing",
                    ));
                }
            }
            for (name, field_value) in fields {
                match node.properties.get(name) {
                    Some(child) => check_node(child, field_value, &field_path(path, name))?,
                    None if node.additional_properties == Some(false) => {
                        return Err(UmdfError::violation(
                            field_path(path, name),
                            "field is not allowed by the schema",
                        ));
                    }
                    None => {}
                }
            }
        }
        Value::Array(elements) => {
            if let Some(items) = &node.items {
                for (index, element) in elements.iter().enumerate() {
                    check_node(items, element, &index_path(path, index))?;
                }
            }
        }
        _ => {}
    }

    Ok(())
}
