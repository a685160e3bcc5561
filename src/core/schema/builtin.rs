//! Schemas every registry starts with

use super::definition::SchemaDefinition;
use serde_json::{json, Value};

fn patient() -> Value {
    json!({
        "title": "Patient",
        "type": "object",
        "properties": {
            "patient_id": {"type": "string"},
            "name": {"type": "string"},
            "date_of_birth": {"type": "string", "format": "date"},
            "sex": {"type": "string", "enum": ["M", "F", "O"]},
            "age": {"type": "integer"},
            "height": {"type": "number"},
            "weight": {"type": "number"}
        },
        "required": ["name"]
    })
}

fn imaging() -> Value {
    json!({
        "title": "Imaging",
        "type": "object",
        "properties": {
            "modality": {"type": "string"},
            "study_date": {"type": "string", "format": "date"},
            "series_description": {"type": "string"},
            "image_data": {"type": "string", "description": "Base64 encoded image"},
            "window_center": {"type": "number"},
            "window_width": {"type": "number"},
            "rescale_intercept": {"type": "number"},
            "rescale_slope": {"type": "number"},
            "pixel_spacing": {"type": "array", "items": {"type": "number"}},
            "slice_thickness": {"type": "number"},
            "rows": {"type": "integer"},
            "columns": {"type": "integer"},
            "bits_allocated": {"type": "integer"},
            "photometric_interpretation": {"type": "string"},
            "transfer_syntax": {"type": "string"},
            "dicom_tags": {"type": "object", "description": "All DICOM tags as key-value pairs"}
        },
        "required": ["modality"]
    })
}

fn lab_results() -> Value {
    json!({
        "title": "Lab results",
        "type": "object",
        "properties": {
            "test_name": {"type": "string"},
            "test_date": {"type": "string", "format": "date"},
            "value": {"type": "number"},
            "unit": {"type": "string"},
            "reference_range": {"type": "string"},
            "status": {"type": "string", "enum": ["normal", "high", "low", "critical"]}
        },
        "required": ["test_name", "value", "unit"]
    })
}

fn medication() -> Value {
    json!({
        "title": "Medication",
        "type": "object",
        "properties": {
            "medication_name": {"type": "string"},
            "dosage": {"type": "string"},
            "frequency": {"type": "string"},
            "start_date": {"type": "string", "format": "date"},
            "end_date": {"type": "string", "format": "date"},
            "prescribing_physician": {"type": "string"}
        },
        "required": ["medication_name", "dosage"]
    })
}

/// Returns the built-in schemas as `(id, definition)` pairs
pub fn builtin_schemas() -> Vec<(&'static str, SchemaDefinition)> {
    [
        ("patient", patient()),
        ("imaging", imaging()),
        ("lab_results", lab_results()),
        ("medication", medication()),
    ]
    .into_iter()
    .map(|(id, doc)| {
        let def = SchemaDefinition::from_json(doc).expect("built-in schema is well-formed");
        (id, def)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schemas_parse() {
        let schemas = builtin_schemas();
        let ids: Vec<_> = schemas.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, ["patient", "imaging", "lab_results", "medication"]);
    }

    #[test]
    fn test_lab_results_required_fields() {
        let schemas = builtin_schemas();
        let (_, lab) = schemas.iter().find(|(id, _)| *id == "lab_results").unwrap();
        assert_eq!(lab.required_fields(), ["test_name", "value", "unit"]);
    }
}
