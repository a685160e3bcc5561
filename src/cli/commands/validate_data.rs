//! Validate command implementation
//!
//! Checks a JSON file against a registered schema without touching any
//! container.

use crate::config::load_config_or_default;
use crate::core::schema::{validate_value, SchemaRegistry};
use crate::domain::UmdfError;
use clap::Args;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateDataArgs {
    /// Schema id or schema path
    pub schema: String,

    /// JSON file holding the module data
    pub file: String,
}

impl ValidateDataArgs {
    /// Execute the validate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(schema = %self.schema, file = %self.file, "Validating data");

        let config = load_config_or_default(config_path)?;
        let registry = SchemaRegistry::from_config(&config.container)?;

        let contents = match tokio::fs::read_to_string(&self.file).await {
            Ok(contents) => contents,
            Err(e) => {
                println!("❌ Cannot read {}: {e}", self.file);
                return Ok(5);
            }
        };

        let result = serde_json::from_str::<serde_json::Value>(&contents)
            .map_err(UmdfError::from)
            .and_then(|data| {
                let resolved = registry.resolve(&self.schema)?;
                validate_value(&resolved.definition, &data)
            });

        match result {
            Ok(()) => {
                println!("✅ {} conforms to schema '{}'", self.file, self.schema);
                Ok(0)
            }
            Err(UmdfError::SchemaViolation { path, message }) => {
                println!("❌ {} does not conform to schema '{}'", self.file, self.schema);
                println!("   At {path}: {message}");
                Ok(2)
            }
            Err(e) => {
                println!("❌ Validation failed");
                println!("   Error: {e}");
                Ok(2)
            }
        }
    }
}
