//! Integration tests for the flat document surface and the string binding

mod common;

use common::cheap_kdf;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use umdf::adapters::binding::{ReaderHandle, WriterHandle};
use umdf::adapters::engine::{create_reader, create_writer_with};
use umdf::adapters::flat::{
    get_supported_schemas, read_umdf_file, validate_schema, write_umdf_file,
};
use umdf::config::UmdfConfig;
use umdf::core::container::{Reader, WriterOptions};
use umdf::core::schema::SchemaRegistry;
use umdf::domain::{ErrorKind, FileAccessMode, ModuleData, ModuleKind};

const DOCUMENT: &str = r#"{
    "author": "dr.smith",
    "encounters": [
        {"modules": [
            {"schema_id": "imaging", "data": {"modality": "CT"},
             "variants": [{"schema_id": "imaging", "data": {"modality": "CT", "window_center": 40}}],
             "annotations": [{"schema_id": "patient", "data": {"name": "reviewed"}}]},
            {"schema_id": "patient", "data": {"name": "Jane"}}
        ]},
        {"modules": []}
    ]
}"#;

#[tokio::test]
async fn test_write_then_read_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.umdf");
    let path_str = path.to_string_lossy().to_string();

    assert!(write_umdf_file(DOCUMENT, &path_str).await);
    assert!(read_umdf_file(&path_str).await);

    let reader = Reader::new(cheap_kdf());
    reader.open_file(&path, None).await.unwrap();
    let info = reader.get_file_info().await.unwrap();
    assert_eq!(info.author, "dr.smith");
    assert_eq!(info.encounter_count, 2);
    assert_eq!(info.module_count, 4);

    let kinds: Vec<_> = info.modules.iter().map(|m| m.kind).collect();
    assert_eq!(kinds.iter().filter(|k| **k == ModuleKind::Primary).count(), 2);
    assert_eq!(kinds.iter().filter(|k| **k == ModuleKind::Variant).count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == ModuleKind::Annotation).count(), 1);

    // Overwrite policy: a second write replaces the first
    assert!(write_umdf_file(r#"{"encounters": [{}]}"#, &path_str).await);
    let reader = Reader::new(cheap_kdf());
    reader.open_file(&path, None).await.unwrap();
    assert_eq!(reader.get_file_info().await.unwrap().module_count, 0);
}

#[tokio::test]
async fn test_invalid_documents_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.umdf");
    let path_str = path.to_string_lossy().to_string();

    assert!(!write_umdf_file("not json", &path_str).await);
    assert!(
        !write_umdf_file(
            r#"{"encounters": [{"modules": [{"schema_id": "lab_results", "data": {}}]}]}"#,
            &path_str
        )
        .await
    );
    assert!(!read_umdf_file(&dir.path().join("absent.umdf").to_string_lossy()).await);
    assert!(!path.exists());

    // A document that fails part way leaves the previous container intact
    assert!(
        write_umdf_file(
            r#"{"encounters": [{"modules": [{"schema_id": "patient", "data": {"name": "Jane"}}]}]}"#,
            &path_str
        )
        .await
    );
    assert!(
        !write_umdf_file(
            r#"{"encounters": [{"modules": [
                {"schema_id": "patient", "data": {"name": "X"}},
                {"schema_id": "lab_results", "data": {}}
            ]}]}"#,
            &path_str
        )
        .await
    );

    let reader = Reader::new(cheap_kdf());
    reader.open_file(&path, None).await.unwrap();
    let ids = reader.get_module_ids().await.unwrap();
    assert_eq!(ids.len(), 1);
    let data = reader.get_module_data(ids[0]).await.unwrap();
    assert_eq!(data.data["name"], "Jane");
    reader.close_file().await.unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, ["bad.umdf"]);
}

#[test]
fn test_schema_surface() {
    let schemas: Vec<String> = serde_json::from_str(&get_supported_schemas()).unwrap();
    assert_eq!(schemas, ["imaging", "lab_results", "medication", "patient"]);

    assert!(validate_schema("patient", r#"{"name": "Jane"}"#));
    assert!(!validate_schema("patient", r#"{"age": 3}"#));
    assert!(!validate_schema("genomics", r#"{}"#));
}

#[tokio::test]
async fn test_binding_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bound.umdf");
    let path_str = path.to_string_lossy().to_string();

    let options = WriterOptions {
        access_mode: FileAccessMode::FailIfExists,
        kdf: cheap_kdf(),
        sync_on_commit: false,
    };
    let writer = WriterHandle::new(create_writer_with(
        Arc::new(SchemaRegistry::builtin()),
        options,
    ));

    assert!(writer
        .create_new_file(&path_str, "dr.smith", Some("pw"))
        .await
        .is_success());
    let encounter = writer.create_new_encounter().await.value().unwrap();
    let patient = ModuleData::builder("patient")
        .field("name", json!("Jane"))
        .build();
    let module_id = writer
        .add_module_to_encounter(&encounter, "patient", patient)
        .await
        .value()
        .unwrap();
    let corrected = ModuleData::builder("patient")
        .field("name", json!("Jane Doe"))
        .build();
    assert!(writer.update_module(&module_id, corrected).await.is_success());
    assert!(writer.close_file().await.is_success());

    let mut config = UmdfConfig::default();
    config.security.kdf_memory_kib = 256;
    config.security.kdf_iterations = 1;
    let reader = ReaderHandle::new(create_reader(&config));

    let denied = reader.open_file(&path_str, Some("nope")).await;
    assert_eq!(denied.error_kind(), Some(ErrorKind::AccessDenied));

    assert!(reader.open_file(&path_str, Some("pw")).await.is_success());
    let trail = reader.get_audit_trail(&module_id).await.value().unwrap();
    assert_eq!(trail.len(), 1);
    let snapshot = reader.get_audit_data(&trail[0]).await.value().unwrap();
    assert_eq!(snapshot.data["name"], json!("Jane"));

    let missing = reader.get_module_data("not-a-uuid").await;
    assert_eq!(missing.error_kind(), Some(ErrorKind::Validation));
    assert!(reader.close_file().await.is_success());
}
