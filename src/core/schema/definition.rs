//! Schema definition model
//!
//! Schemas are written in a structural subset of JSON Schema: `type`,
//! `properties`, `required`, `items`, `enum`, `format` and
//! `additionalProperties: false`. Keywords outside the subset are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// JSON type a schema node accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
        };
        f.write_str(name)
    }
}

/// One node of a schema tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Accepted JSON type; `None` accepts any type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaType>,

    /// Nested field schemas for objects
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,

    /// Fields that must be present on objects
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Element schema for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    /// Closed set of accepted values
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,

    /// String format (`date`, `date-time`); other formats are not checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// `Some(false)` rejects object fields not listed in `properties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named, top-level schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Declared identifier, if the document carries one
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub declared_id: Option<String>,

    /// Human-readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Root node; module data is validated against it
    #[serde(flatten)]
    pub root: SchemaNode,
}

impl SchemaDefinition {
    /// Parses a definition from a JSON document
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Returns the fields required at the top level
    pub fn required_fields(&self) -> &[String] {
        &self.root.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_definition() {
        let def = SchemaDefinition::from_json(json!({
            "$id": "vitals",
            "title": "Vital signs",
            "type": "object",
            "properties": {
                "pulse": {"type": "integer"},
                "readings": {"type": "array", "items": {"type": "number"}}
            },
            "required": ["pulse"],
            "additionalProperties": false
        }))
        .unwrap();

        assert_eq!(def.declared_id.as_deref(), Some("vitals"));
        assert_eq!(def.root.kind, Some(SchemaType::Object));
        assert_eq!(def.required_fields(), ["pulse".to_string()]);
        assert_eq!(def.root.additional_properties, Some(false));
        let readings = &def.root.properties["readings"];
        assert_eq!(
            readings.items.as_ref().and_then(|i| i.kind),
            Some(SchemaType::Number)
        );
    }

    #[test]
    fn test_unknown_keywords_ignored() {
        let def = SchemaDefinition::from_json(json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "minProperties": 1
        }))
        .unwrap();
        assert!(def.declared_id.is_none());
        assert!(def.root.properties.is_empty());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = SchemaDefinition::from_json(json!({"type": "decimal"}));
        assert!(result.is_err());
    }
}
