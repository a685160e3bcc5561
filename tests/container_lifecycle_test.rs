//! Integration tests for writing, closing and reopening containers

mod common;

use common::{patient, reader, writer};
use serde_json::json;
use std::io::Write;
use tempfile::TempDir;
use umdf::domain::{ErrorKind, FileAccessMode, ModuleData, ModuleKind, UmdfError};

#[tokio::test]
async fn test_tree_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");

    let writer = writer(FileAccessMode::FailIfExists);
    writer.create_new_file(&path, "dr.smith", None).await.unwrap();
    let encounter = writer.create_new_encounter().await.unwrap();
    let scan = ModuleData::builder("imaging")
        .field("modality", json!("CT"))
        .field("pixel_spacing", json!([0.5, 0.5]))
        .build();
    let scan_id = writer
        .add_module_to_encounter(encounter, "imaging", scan)
        .await
        .unwrap();
    let variant = ModuleData::builder("imaging")
        .field("modality", json!("CT"))
        .field("window_center", json!(40.0))
        .build();
    let variant_id = writer
        .add_variant_module(scan_id, "imaging", variant)
        .await
        .unwrap();
    let note_id = writer
        .add_annotation(scan_id, "patient", patient("Jane"))
        .await
        .unwrap();
    writer.close_file().await.unwrap();

    let reader = reader();
    reader.open_file(&path, None).await.unwrap();
    let info = reader.get_file_info().await.unwrap();
    assert_eq!(info.author, "dr.smith");
    assert_eq!(info.encounter_count, 1);
    assert_eq!(info.module_count, 3);
    assert!(!info.password_protected);

    let relations = reader.get_module_relations(scan_id).await.unwrap();
    assert_eq!(relations.variants, vec![variant_id]);
    assert_eq!(relations.annotations, vec![note_id]);

    let kinds: Vec<_> = info.modules.iter().map(|m| (m.id, m.kind)).collect();
    assert!(kinds.contains(&(variant_id, ModuleKind::Variant)));
    assert!(kinds.contains(&(note_id, ModuleKind::Annotation)));

    let stored = reader.get_module_data(scan_id).await.unwrap();
    assert_eq!(stored.id, Some(scan_id));
    assert_eq!(stored.schema_id, "imaging");
    assert_eq!(stored.data["pixel_spacing"], json!([0.5, 0.5]));

    let encounter = reader.get_encounter(encounter).await.unwrap();
    assert_eq!(encounter.modules, vec![scan_id]);
    reader.close_file().await.unwrap();
}

#[tokio::test]
async fn test_writer_reopens_and_appends() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");

    let writer = writer(FileAccessMode::FailIfExists);
    writer.create_new_file(&path, "dr.smith", None).await.unwrap();
    let encounter = writer.create_new_encounter().await.unwrap();
    writer.close_file().await.unwrap();

    writer.open_file(&path, "dr.jones", None).await.unwrap();
    let id = writer
        .add_module_to_encounter(encounter, "patient", patient("Jane"))
        .await
        .unwrap();
    writer.close_file().await.unwrap();

    let reader = reader();
    reader.open_file(&path, None).await.unwrap();
    assert_eq!(reader.get_module_ids().await.unwrap(), vec![id]);
    // The header keeps the creating author
    assert_eq!(reader.get_file_info().await.unwrap().author, "dr.smith");
}

#[tokio::test]
async fn test_rejected_mutation_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");

    let writer = writer(FileAccessMode::FailIfExists);
    writer.create_new_file(&path, "dr.smith", None).await.unwrap();
    let encounter = writer.create_new_encounter().await.unwrap();
    let before = std::fs::read(&path).unwrap();

    let invalid = ModuleData::builder("lab_results")
        .field("test_name", json!("HbA1c"))
        .build();
    let err = writer
        .add_module_to_encounter(encounter, "lab_results", invalid)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaViolation);

    let err = writer
        .add_module_to_encounter(encounter, "genomics", patient("Jane"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownSchema);

    assert_eq!(std::fs::read(&path).unwrap(), before);
    writer.close_file().await.unwrap();
}

#[tokio::test]
async fn test_tampered_journal_is_integrity_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");

    let writer = writer(FileAccessMode::FailIfExists);
    writer.create_new_file(&path, "dr.smith", None).await.unwrap();
    let encounter = writer.create_new_encounter().await.unwrap();
    writer
        .add_module_to_encounter(encounter, "patient", patient("Jane"))
        .await
        .unwrap();
    writer.close_file().await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, contents.replace("Jane", "Joan")).unwrap();

    let err = reader().open_file(&path, None).await.unwrap_err();
    assert!(matches!(err, UmdfError::Integrity(_)));
}

#[tokio::test]
async fn test_truncated_journal_is_integrity_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");

    let writer = writer(FileAccessMode::FailIfExists);
    writer.create_new_file(&path, "dr.smith", None).await.unwrap();
    writer.create_new_encounter().await.unwrap();
    writer.close_file().await.unwrap();

    let mut contents = std::fs::read(&path).unwrap();
    contents.truncate(contents.len() - 5);
    std::fs::write(&path, contents).unwrap();

    let err = reader().open_file(&path, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[tokio::test]
async fn test_appended_garbage_is_integrity_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");

    let writer = writer(FileAccessMode::FailIfExists);
    writer.create_new_file(&path, "dr.smith", None).await.unwrap();
    writer.close_file().await.unwrap();

    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "{{\"seq\": 7}}").unwrap();

    let err = reader().open_file(&path, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[tokio::test]
async fn test_close_twice_is_invalid_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");

    let writer = writer(FileAccessMode::FailIfExists);
    writer.create_new_file(&path, "dr.smith", None).await.unwrap();
    writer.close_file().await.unwrap();

    let err = writer.close_file().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}
