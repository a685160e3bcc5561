//! Schemas command implementation
//!
//! Lists the registered schema ids, or prints one schema definition.

use crate::config::load_config_or_default;
use crate::core::schema::SchemaRegistry;
use clap::Args;

/// Arguments for the schemas command
#[derive(Args, Debug)]
pub struct SchemasArgs {
    /// Schema id to print; lists all schemas when omitted
    pub id: Option<String>,
}

impl SchemasArgs {
    /// Execute the schemas command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let registry = match load_config_or_default(config_path)
            .and_then(|config| SchemaRegistry::from_config(&config.container))
        {
            Ok(registry) => registry,
            Err(e) => {
                println!("❌ Failed to load schemas");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match &self.id {
            None => {
                println!("📋 Registered schemas:");
                for id in registry.supported_schemas() {
                    let required = registry
                        .get(&id)
                        .map(|def| def.required_fields().join(", "))
                        .unwrap_or_default();
                    println!("  {id:<16} required: [{required}]");
                }
                Ok(0)
            }
            Some(id) => match registry.get(id) {
                Some(definition) => {
                    println!("{}", serde_json::to_string_pretty(definition.as_ref())?);
                    Ok(0)
                }
                None => {
                    println!("❌ Unknown schema: {id}");
                    Ok(2)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_schema_exits_two() {
        let args = SchemasArgs {
            id: Some("genomics".to_string()),
        };
        let code = args.execute("/no/such/umdf.toml").await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_list_without_config_file() {
        let args = SchemasArgs { id: None };
        assert_eq!(args.execute("/no/such/umdf.toml").await.unwrap(), 0);
    }
}
