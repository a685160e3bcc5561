//! Audit command implementation
//!
//! Prints the audit trail of one module, optionally with the preserved data
//! of every entry.

use crate::adapters::engine::create_reader;
use crate::cli::exit_code_for;
use crate::config::{load_config_or_default, secret_string_opt};
use crate::domain::ModuleId;
use clap::Args;
use std::path::Path;

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Container file
    pub file: String,

    /// Module id
    pub module_id: String,

    /// Container password
    #[arg(long, env = "UMDF_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Print the preserved data of each entry
    #[arg(long)]
    pub show_data: bool,
}

impl AuditArgs {
    /// Execute the audit command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let module_id = match ModuleId::new(&self.module_id) {
            Ok(id) => id,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let config = load_config_or_default(config_path)?;
        let reader = create_reader(&config);
        let password = secret_string_opt(self.password.clone());

        if let Err(e) = reader.open_file(Path::new(&self.file), password.as_ref()).await {
            println!("❌ Cannot open {}", self.file);
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }

        let code = self.print_trail(reader.as_ref(), module_id).await;
        reader.close_file().await?;
        code
    }

    async fn print_trail(
        &self,
        reader: &dyn crate::adapters::engine::ContainerReader,
        module_id: ModuleId,
    ) -> anyhow::Result<i32> {
        let trail = match reader.get_audit_trail(module_id).await {
            Ok(trail) => trail,
            Err(e) => {
                println!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!("🔍 Audit trail of {module_id}: {} entr(ies)", trail.len());
        for entry in &trail {
            println!(
                "  v{} replaced at {} by {} (sha256 {})",
                entry.version,
                entry.recorded_at.to_rfc3339(),
                entry.author,
                &entry.checksum[..entry.checksum.len().min(12)]
            );
            if self.show_data {
                let snapshot = reader.get_audit_data(entry).await?;
                println!("{}", serde_json::to_string_pretty(&snapshot.data)?);
            }
        }
        Ok(0)
    }
}
