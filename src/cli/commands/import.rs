//! Import command implementation
//!
//! Writes a JSON container document into a new container file. A failed
//! import leaves an existing output file as it was.

use crate::adapters::flat::{write_document_staged, ContainerDocument};
use crate::cli::exit_code_for;
use crate::config::{load_config_or_default, secret_string_opt};
use crate::core::container::WriterOptions;
use crate::core::schema::SchemaRegistry;
use crate::domain::FileAccessMode;
use crate::log_error_with_context;
use clap::Args;
use std::path::Path;
use std::sync::Arc;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON container document
    pub document: String,

    /// Container file to write
    pub output: String,

    /// Access policy for an existing output file (defaults to the configured one)
    #[arg(long)]
    pub access_mode: Option<FileAccessMode>,

    /// Author recorded on the container, overriding the document's author
    #[arg(long)]
    pub author: Option<String>,

    /// Protect the new container with a password
    #[arg(long, env = "UMDF_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(document = %self.document, output = %self.output, "Importing document");

        let config = load_config_or_default(config_path)?;
        let mode = self.access_mode.unwrap_or(config.container.access_mode);
        let registry = Arc::new(SchemaRegistry::from_config(&config.container)?);
        let options = WriterOptions {
            access_mode: mode,
            ..WriterOptions::from(&config)
        };

        let contents = match tokio::fs::read_to_string(&self.document).await {
            Ok(contents) => contents,
            Err(e) => {
                println!("❌ Cannot read {}: {e}", self.document);
                return Ok(5);
            }
        };
        let mut document: ContainerDocument = match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                println!("❌ {} is not a valid container document", self.document);
                println!("   Error: {e}");
                return Ok(2);
            }
        };
        if let Some(author) = &self.author {
            document.author = author.clone();
        }

        let password = secret_string_opt(self.password.clone());
        println!("📦 Writing {} ({mode})", self.output);

        match write_document_staged(
            registry,
            options,
            &document,
            Path::new(&self.output),
            password.as_ref(),
        )
        .await
        {
            Ok(summary) => {
                println!(
                    "✅ Imported {} encounter(s), {} module(s)",
                    summary.encounters, summary.modules
                );
                Ok(0)
            }
            Err(e) => {
                log_error_with_context!(&e, "Import failed");
                println!("❌ Import failed");
                println!("   Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_import_then_conflict() {
        let dir = TempDir::new().unwrap();
        let document = dir.path().join("doc.json");
        std::fs::write(
            &document,
            r#"{"author": "dr.a", "encounters": [{"modules": [{"schema_id": "patient", "data": {"name": "Jane"}}]}]}"#,
        )
        .unwrap();
        let output = dir.path().join("out.umdf");

        let args = ImportArgs {
            document: document.to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            access_mode: Some(FileAccessMode::FailIfExists),
            author: None,
            password: None,
        };
        assert_eq!(args.execute("/no/such/umdf.toml").await.unwrap(), 0);
        assert!(output.exists());

        assert_eq!(args.execute("/no/such/umdf.toml").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_overwrite_keeps_previous_container() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(
            &good,
            r#"{"encounters": [{"modules": [{"schema_id": "patient", "data": {"name": "Jane"}}]}]}"#,
        )
        .unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(
            &bad,
            r#"{"encounters": [{"modules": [
                {"schema_id": "patient", "data": {"name": "X"}},
                {"schema_id": "lab_results", "data": {}}
            ]}]}"#,
        )
        .unwrap();
        let output = dir.path().join("out.umdf");

        let mut args = ImportArgs {
            document: good.to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            access_mode: Some(FileAccessMode::Overwrite),
            author: None,
            password: None,
        };
        assert_eq!(args.execute("/no/such/umdf.toml").await.unwrap(), 0);
        let before = std::fs::read(&output).unwrap();

        args.document = bad.to_string_lossy().to_string();
        assert_eq!(args.execute("/no/such/umdf.toml").await.unwrap(), 2);
        assert_eq!(std::fs::read(&output).unwrap(), before);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }
}
