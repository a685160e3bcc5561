//! Integration tests for access policies and container passwords

mod common;

use common::{patient, reader, writer};
use tempfile::TempDir;
use umdf::config::{secret_string, SecretString};
use umdf::domain::{ErrorKind, FileAccessMode};

fn secret(value: &str) -> SecretString {
    secret_string(value.to_string())
}

#[tokio::test]
async fn test_password_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secure.umdf");
    let password = secret("correct horse");

    let writer = writer(FileAccessMode::FailIfExists);
    writer
        .create_new_file(&path, "dr.smith", Some(&password))
        .await
        .unwrap();
    writer.create_new_encounter().await.unwrap();
    writer.close_file().await.unwrap();

    let reader = reader();
    reader.open_file(&path, Some(&password)).await.unwrap();
    let info = reader.get_file_info().await.unwrap();
    assert!(info.password_protected);
    assert_eq!(info.encounter_count, 1);
    reader.close_file().await.unwrap();

    // Stored as a PHC hash, never in clear
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("correct horse"));
    assert!(contents.contains("$argon2id$"));
}

#[tokio::test]
async fn test_wrong_or_missing_password_denied() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secure.umdf");

    let writer = writer(FileAccessMode::FailIfExists);
    writer
        .create_new_file(&path, "dr.smith", Some(&secret("right")))
        .await
        .unwrap();
    writer.close_file().await.unwrap();

    let reader = reader();
    let err = reader
        .open_file(&path, Some(&secret("wrong")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    let err = reader.open_file(&path, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    assert!(!reader.is_open().await);

    let err = writer
        .open_file(&path, "dr.jones", Some(&secret("wrong")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
}

#[tokio::test]
async fn test_password_on_unprotected_container_denied() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("open.umdf");

    let writer = writer(FileAccessMode::FailIfExists);
    writer.create_new_file(&path, "dr.smith", None).await.unwrap();
    writer.close_file().await.unwrap();

    let err = reader()
        .open_file(&path, Some(&secret("anything")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    // An empty password counts as none
    let reader = reader();
    reader.open_file(&path, Some(&secret(""))).await.unwrap();
    reader.close_file().await.unwrap();
}

#[tokio::test]
async fn test_missing_file_with_password_is_access_denied() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.umdf");

    let err = reader()
        .open_file(&path, Some(&secret("pw")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    let err = reader().open_file(&path, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_fail_if_exists_conflict() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");
    std::fs::write(&path, b"not a container").unwrap();

    let writer = writer(FileAccessMode::FailIfExists);
    let err = writer
        .create_new_file(&path, "dr.smith", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(std::fs::read(&path).unwrap(), b"not a container");
    assert!(!writer.is_open().await);
}

#[tokio::test]
async fn test_overwrite_replaces_container() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");

    let first = writer(FileAccessMode::FailIfExists);
    first.create_new_file(&path, "dr.smith", None).await.unwrap();
    let encounter = first.create_new_encounter().await.unwrap();
    first
        .add_module_to_encounter(encounter, "patient", patient("Jane"))
        .await
        .unwrap();
    first.close_file().await.unwrap();

    let second = writer(FileAccessMode::Overwrite);
    second.create_new_file(&path, "dr.jones", None).await.unwrap();
    second.close_file().await.unwrap();

    let reader = reader();
    reader.open_file(&path, None).await.unwrap();
    let info = reader.get_file_info().await.unwrap();
    assert_eq!(info.author, "dr.jones");
    assert_eq!(info.encounter_count, 0);
    assert_eq!(info.module_count, 0);
}

#[tokio::test]
async fn test_allow_update_appends_to_existing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("visit.umdf");

    let updater = writer(FileAccessMode::AllowUpdate);
    let err = updater
        .create_new_file(&path, "dr.smith", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let first = writer(FileAccessMode::FailIfExists);
    first.create_new_file(&path, "dr.smith", None).await.unwrap();
    let encounter = first.create_new_encounter().await.unwrap();
    first.close_file().await.unwrap();

    updater.create_new_file(&path, "dr.jones", None).await.unwrap();
    let id = updater
        .add_module_to_encounter(encounter, "patient", patient("Jane"))
        .await
        .unwrap();
    updater.close_file().await.unwrap();

    let reader = reader();
    reader.open_file(&path, None).await.unwrap();
    assert_eq!(reader.get_module_ids().await.unwrap(), vec![id]);
}

#[tokio::test]
async fn test_access_mode_can_change_between_files() {
    let mut writer = writer(FileAccessMode::FailIfExists);
    assert_eq!(writer.access_mode(), FileAccessMode::FailIfExists);
    writer.set_file_access_mode(FileAccessMode::Overwrite);
    assert_eq!(writer.access_mode(), FileAccessMode::Overwrite);
}
