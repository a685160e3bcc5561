//! Info command implementation
//!
//! Opens a container read-only and prints its header and module graph.

use crate::adapters::engine::create_reader;
use crate::cli::exit_code_for;
use crate::config::{load_config_or_default, secret_string_opt};
use crate::domain::ModuleKind;
use clap::Args;
use std::path::Path;

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Container file
    pub file: String,

    /// Container password
    #[arg(long, env = "UMDF_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Print the file information as JSON
    #[arg(long)]
    pub json: bool,
}

impl InfoArgs {
    /// Execute the info command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config_or_default(config_path)?;
        let reader = create_reader(&config);
        let password = secret_string_opt(self.password.clone());

        if let Err(e) = reader.open_file(Path::new(&self.file), password.as_ref()).await {
            println!("❌ Cannot open {}", self.file);
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }
        let info = reader.get_file_info().await;
        reader.close_file().await?;
        let info = info?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
            return Ok(0);
        }

        println!("📊 Container: {}", info.path);
        println!("  Author: {}", info.author);
        println!("  Created: {}", info.created_at.to_rfc3339());
        println!("  Format Version: {}", info.format_version);
        println!("  Password Protected: {}", info.password_protected);
        println!("  Encounters: {}", info.encounter_count);
        println!("  Modules: {}", info.module_count);

        for encounter in &info.encounters {
            println!();
            println!("  Encounter {} ({})", encounter.id, encounter.created_at.to_rfc3339());
            for module in info
                .modules
                .iter()
                .filter(|m| m.encounter_id == encounter.id)
            {
                let marker = match module.kind {
                    ModuleKind::Primary => "•",
                    ModuleKind::Variant => "↳ variant",
                    ModuleKind::Annotation => "↳ note",
                };
                println!(
                    "    {marker} {} [{}] v{}",
                    module.id, module.schema_id, module.version
                );
            }
        }
        println!();
        Ok(0)
    }
}
