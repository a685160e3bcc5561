//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "umdf.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing UMDF configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point container.schema_dir at your custom schemas (optional)");
                println!("  3. Validate configuration: umdf validate-config");
                println!("  4. List available schemas: umdf schemas");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# UMDF Configuration File

[application]
log_level = "info"

[container]
access_mode = "fail_if_exists"
sync_on_commit = true

[security]
kdf_memory_kib = 19456
kdf_iterations = 2
kdf_parallelism = 1

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# UMDF Configuration File
#
# Every setting has a default; this file only needs the ones you change.
# Values of the form ${VAR} are replaced from the environment, and any
# setting can be overridden with UMDF_<SECTION>_<KEY>, for example
# UMDF_CONTAINER_ACCESS_MODE=overwrite.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Container Settings
# ============================================================================
[container]
# What creating a container does when the path already exists:
# - fail_if_exists: refuse
# - allow_update: open the existing container and append to it
# - overwrite: replace it
access_mode = "fail_if_exists"

# Directory of additional JSON schemas, laid out as <name>/v<version>.json
# schema_dir = "${UMDF_SCHEMA_HOME}"

# Flush each journal entry to disk before acknowledging the mutation
sync_on_commit = true

# ============================================================================
# Security Settings
# ============================================================================
[security]
# Argon2id cost for new container passwords. Existing containers keep the
# parameters they were created with.
kdf_memory_kib = 19456
kdf_iterations = 2
kdf_parallelism = 1

# Container passwords are never stored here. Pass --password or set
# UMDF_PASSWORD.

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Write JSON logs to local files in addition to the console
local_enabled = false

# Local log directory
local_path = "./logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
