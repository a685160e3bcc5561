//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::UmdfConfig;
use crate::domain::errors::UmdfError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into UmdfConfig
/// 4. Applies environment variable overrides (UMDF_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use umdf::config::loader::load_config;
///
/// let config = load_config("umdf.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<UmdfConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(UmdfError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        UmdfError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: UmdfConfig = toml::from_str(&contents)
        .map_err(|e| UmdfError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        UmdfError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads the configuration file if it exists, otherwise the defaults
///
/// Environment overrides apply in both cases.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<UmdfConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Configuration file absent, using defaults");
    let mut config = UmdfConfig::default();
    apply_env_overrides(&mut config)?;
    config
        .validate()
        .map_err(|e| UmdfError::Configuration(format!("Configuration validation failed: {}", e)))?;
    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("environment variable pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(UmdfError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using UMDF_* prefix
///
/// Environment variables follow the pattern: UMDF_<SECTION>_<KEY>
/// For example: UMDF_CONTAINER_ACCESS_MODE, UMDF_LOGGING_LOCAL_PATH
fn apply_env_overrides(config: &mut UmdfConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("UMDF_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Container overrides
    if let Ok(val) = std::env::var("UMDF_CONTAINER_ACCESS_MODE") {
        config.container.access_mode = val.parse().map_err(UmdfError::Configuration)?;
    }
    if let Ok(val) = std::env::var("UMDF_CONTAINER_SCHEMA_DIR") {
        config.container.schema_dir = Some(val);
    }
    if let Ok(val) = std::env::var("UMDF_CONTAINER_SYNC_ON_COMMIT") {
        config.container.sync_on_commit = val.parse().unwrap_or(true);
    }

    // Security overrides
    if let Ok(val) = std::env::var("UMDF_SECURITY_KDF_MEMORY_KIB") {
        if let Ok(memory) = val.parse() {
            config.security.kdf_memory_kib = memory;
        }
    }
    if let Ok(val) = std::env::var("UMDF_SECURITY_KDF_ITERATIONS") {
        if let Ok(iterations) = val.parse() {
            config.security.kdf_iterations = iterations;
        }
    }
    if let Ok(val) = std::env::var("UMDF_SECURITY_KDF_PARALLELISM") {
        if let Ok(parallelism) = val.parse() {
            config.security.kdf_parallelism = parallelism;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("UMDF_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("UMDF_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("UMDF_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
