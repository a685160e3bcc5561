//! Integration tests for schema resolution and structural validation

use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use test_case::test_case;
use umdf::core::schema::{validate_value, SchemaRegistry, SchemaValidator};
use umdf::domain::{ErrorKind, UmdfError};

fn violation_path(result: umdf::domain::Result<()>) -> String {
    match result {
        Err(UmdfError::SchemaViolation { path, .. }) => path,
        other => panic!("expected schema violation, got {other:?}"),
    }
}

#[test_case("patient", json!({"name": "Jane"}); "patient minimal")]
#[test_case("patient", json!({"name": "Jane", "sex": "F", "date_of_birth": "1980-02-29", "age": 44}); "patient full")]
#[test_case("patient", json!({"name": "Jane", "age": 44.0}); "whole float is integer")]
#[test_case("imaging", json!({"modality": "MR", "pixel_spacing": [0.8, 0.8], "dicom_tags": {"0008,0060": "MR"}}); "imaging with tags")]
#[test_case("lab_results", json!({"test_name": "HbA1c", "value": 6.1, "unit": "%", "status": "high"}); "lab result")]
#[test_case("medication", json!({"medication_name": "Metformin", "dosage": "500mg", "extra": true}); "unknown keys allowed")]
fn test_conforming_data(schema: &str, data: Value) {
    let validator = SchemaValidator::new(Arc::new(SchemaRegistry::builtin()));
    validator.validate(schema, &data).unwrap();
}

#[test_case("patient", json!({}), "name"; "missing required")]
#[test_case("patient", json!({"name": 42}), "name"; "wrong type")]
#[test_case("patient", json!({"name": "Jane", "sex": "X"}), "sex"; "not in enum")]
#[test_case("patient", json!({"name": "Jane", "date_of_birth": "1980-02-30"}), "date_of_birth"; "impossible date")]
#[test_case("patient", json!({"name": "Jane", "age": 44.5}), "age"; "fractional integer")]
#[test_case("imaging", json!({"modality": "CT", "pixel_spacing": [0.5, "wide"]}), "pixel_spacing[1]"; "bad array item")]
#[test_case("lab_results", json!({"test_name": "HbA1c", "value": 6.1}), "unit"; "missing unit")]
#[test_case("patient", json!(["Jane"]), "$"; "root not object")]
fn test_violations(schema: &str, data: Value, expected_path: &str) {
    let validator = SchemaValidator::new(Arc::new(SchemaRegistry::builtin()));
    assert_eq!(violation_path(validator.validate(schema, &data)), expected_path);
}

#[test]
fn test_first_missing_required_field_reported() {
    let validator = SchemaValidator::new(Arc::new(SchemaRegistry::builtin()));
    let result = validator.validate("lab_results", &json!({"unit": "%"}));
    assert_eq!(violation_path(result), "test_name");
}

#[test]
fn test_unknown_schema() {
    let validator = SchemaValidator::new(Arc::new(SchemaRegistry::builtin()));
    let err = validator.validate("genomics", &json!({})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownSchema);
}

#[test]
fn test_schema_dir_extends_registry() {
    let dir = TempDir::new().unwrap();
    let vitals_dir = dir.path().join("vitals");
    std::fs::create_dir_all(&vitals_dir).unwrap();
    std::fs::write(
        vitals_dir.join("v1.0.json"),
        json!({
            "type": "object",
            "properties": {
                "heart_rate": {"type": "integer"},
                "readings": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"at": {"type": "string", "format": "date-time"}},
                        "required": ["at"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["heart_rate"]
        })
        .to_string(),
    )
    .unwrap();

    let registry = SchemaRegistry::builtin()
        .with_schema_dir(dir.path())
        .unwrap();
    assert!(registry.contains("vitals"));
    assert!(registry.contains("patient"));

    let resolved = registry.resolve("vitals/v1.0.json").unwrap();
    assert_eq!(resolved.schema_id, "vitals");

    validate_value(
        &resolved.definition,
        &json!({"heart_rate": 72, "readings": [{"at": "2025-03-01T10:00:00Z"}]}),
    )
    .unwrap();

    let result = validate_value(
        &resolved.definition,
        &json!({"heart_rate": 72, "readings": [{"at": "2025-03-01T10:00:00Z", "by": "nurse"}]}),
    );
    assert_eq!(violation_path(result), "readings[0].by");

    let result = validate_value(
        &resolved.definition,
        &json!({"heart_rate": 72, "readings": [{"at": "yesterday"}]}),
    );
    assert_eq!(violation_path(result), "readings[0].at");
}

#[test]
fn test_missing_schema_dir_is_configuration_error() {
    let err = SchemaRegistry::builtin()
        .with_schema_dir("/no/such/schemas")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
