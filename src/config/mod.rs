//! Configuration management for the UMDF engine.
//!
//! TOML configuration with `${VAR_NAME}` environment substitution, `UMDF_*`
//! environment overrides, defaults for every setting and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use umdf::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("umdf.toml")?;
//! println!("Access mode: {}", config.container.access_mode);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ContainerConfig`] - Access policy, schema directory, commit durability
//! - [`SecurityConfig`] - Argon2id cost parameters for container passwords
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [container]
//! access_mode = "fail_if_exists"
//! schema_dir = "${UMDF_SCHEMA_HOME}"
//!
//! [security]
//! kdf_memory_kib = 19456
//! kdf_iterations = 2
//! ```
//!
//! Container passwords never live in the configuration file; callers hand them
//! to the engine as [`SecretString`] values.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{ApplicationConfig, ContainerConfig, LoggingConfig, SecurityConfig, UmdfConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
