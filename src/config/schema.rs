//! Configuration schema types
//!
//! This module defines the configuration structure for the UMDF engine.

use crate::domain::FileAccessMode;
use serde::{Deserialize, Serialize};

/// Main UMDF configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UmdfConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Container handling settings
    #[serde(default)]
    pub container: ContainerConfig,

    /// Password hashing settings
    #[serde(default)]
    pub security: SecurityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl UmdfConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.container.validate()?;
        self.security.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Container handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Policy writers apply when creating a container
    #[serde(default)]
    pub access_mode: FileAccessMode,

    /// Directory holding additional JSON schema files
    #[serde(default)]
    pub schema_dir: Option<String>,

    /// Flush every journal entry to stable storage before committing it
    #[serde(default = "default_true")]
    pub sync_on_commit: bool,
}

impl ContainerConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(dir) = &self.schema_dir {
            if dir.trim().is_empty() {
                return Err("container.schema_dir cannot be empty when set".to_string());
            }
        }
        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            access_mode: FileAccessMode::default(),
            schema_dir: None,
            sync_on_commit: true,
        }
    }
}

/// Argon2id cost parameters for container passwords
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Memory cost in KiB
    #[serde(default = "default_kdf_memory_kib")]
    pub kdf_memory_kib: u32,

    /// Number of passes
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Degree of parallelism
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl SecurityConfig {
    fn validate(&self) -> Result<(), String> {
        if self.kdf_parallelism == 0 || self.kdf_parallelism > 16 {
            return Err(format!(
                "security.kdf_parallelism must be between 1 and 16, got {}",
                self.kdf_parallelism
            ));
        }

        if self.kdf_iterations == 0 {
            return Err("security.kdf_iterations must be > 0".to_string());
        }

        // Argon2 requires at least 8 KiB per lane
        if self.kdf_memory_kib < 8 * self.kdf_parallelism {
            return Err(format!(
                "security.kdf_memory_kib must be at least {} for parallelism {}, got {}",
                8 * self.kdf_parallelism,
                self.kdf_parallelism,
                self.kdf_memory_kib
            ));
        }

        Ok(())
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            kdf_memory_kib: default_kdf_memory_kib(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_kdf_memory_kib() -> u32 {
    19_456
}

fn default_kdf_iterations() -> u32 {
    2
}

fn default_kdf_parallelism() -> u32 {
    1
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
