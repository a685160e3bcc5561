//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they do
//! not interfere with each other.

use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use umdf::config::{load_config, load_config_or_default};
use umdf::core::access::KdfParams;
use umdf::core::container::WriterOptions;
use umdf::domain::{ErrorKind, FileAccessMode};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("UMDF_APPLICATION_LOG_LEVEL");
    std::env::remove_var("UMDF_CONTAINER_ACCESS_MODE");
    std::env::remove_var("UMDF_CONTAINER_SCHEMA_DIR");
    std::env::remove_var("UMDF_SECURITY_KDF_MEMORY_KIB");
    std::env::remove_var("TEST_UMDF_SCHEMA_DIR");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[container]
access_mode = "allow_update"
sync_on_commit = false

[security]
kdf_memory_kib = 65536
kdf_iterations = 3
kdf_parallelism = 2

[logging]
local_enabled = true
local_path = "/var/log/umdf"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.container.access_mode, FileAccessMode::AllowUpdate);
    assert!(!config.container.sync_on_commit);
    assert_eq!(
        KdfParams::from(&config.security),
        KdfParams::new(65536, 3, 2)
    );
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_path, "/var/log/umdf");
    assert_eq!(config.logging.local_rotation, "hourly");

    let options = WriterOptions::from(&config);
    assert_eq!(options.access_mode, FileAccessMode::AllowUpdate);
    assert!(!options.sync_on_commit);
}

#[test]
fn test_load_empty_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("");
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.container.access_mode, FileAccessMode::FailIfExists);
    assert!(config.container.schema_dir.is_none());
    assert!(config.container.sync_on_commit);
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "daily");
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_UMDF_SCHEMA_DIR", "/srv/schemas");

    let temp_file = write_config(
        r#"
[container]
schema_dir = "${TEST_UMDF_SCHEMA_DIR}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.container.schema_dir.as_deref(), Some("/srv/schemas"));

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[container]
schema_dir = "${TEST_UMDF_SCHEMA_DIR}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("TEST_UMDF_SCHEMA_DIR"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("UMDF_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("UMDF_CONTAINER_ACCESS_MODE", "overwrite");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[container]
access_mode = "fail_if_exists"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.container.access_mode, FileAccessMode::Overwrite);

    // Overrides also apply without a file
    let config = load_config_or_default("/no/such/umdf.toml").unwrap();
    assert_eq!(config.container.access_mode, FileAccessMode::Overwrite);

    cleanup_env_vars();
}

#[test]
fn test_invalid_access_mode_override() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("UMDF_CONTAINER_ACCESS_MODE", "sometimes");

    let err = load_config_or_default("/no/such/umdf.toml").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "invalid_level"
"#,
    );
    assert!(load_config(temp_file.path()).is_err());

    let temp_file = write_config(
        r#"
[security]
kdf_memory_kib = 8
kdf_parallelism = 4
"#,
    );
    assert!(load_config(temp_file.path()).is_err());
}

#[test]
fn test_missing_config_file() {
    let err = load_config("/no/such/umdf.toml").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
