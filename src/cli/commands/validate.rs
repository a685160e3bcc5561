//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the UMDF configuration file.

use crate::config::load_config;
use crate::core::schema::SchemaRegistry;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as it loads
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = match SchemaRegistry::from_config(&config.container) {
            Ok(registry) => registry,
            Err(e) => {
                println!("❌ Schema directory could not be loaded");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Access Mode: {}", config.container.access_mode);
        println!(
            "  Schema Directory: {}",
            config.container.schema_dir.as_deref().unwrap_or("(built-in only)")
        );
        println!("  Sync On Commit: {}", config.container.sync_on_commit);
        println!(
            "  KDF: argon2id m={}KiB t={} p={}",
            config.security.kdf_memory_kib,
            config.security.kdf_iterations,
            config.security.kdf_parallelism
        );
        println!("  File Logging: {}", config.logging.local_enabled);
        println!("  Schemas: {}", registry.supported_schemas().join(", "));
        println!();
        Ok(0)
    }
}
