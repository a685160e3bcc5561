//! CLI interface and argument parsing
//!
//! This module provides the `umdf` command-line interface using clap.

pub mod commands;

use crate::domain::{ErrorKind, UmdfError};
use clap::{Parser, Subcommand};

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration and validation errors
pub const EXIT_INVALID: i32 = 2;
/// Exit code for rejected container credentials
pub const EXIT_ACCESS_DENIED: i32 = 3;
/// Exit code for everything else
pub const EXIT_FATAL: i32 = 5;

/// Maps an engine error to the process exit code
pub fn exit_code_for(error: &UmdfError) -> i32 {
    match error.kind() {
        ErrorKind::AccessDenied => EXIT_ACCESS_DENIED,
        ErrorKind::Configuration
        | ErrorKind::Validation
        | ErrorKind::SchemaViolation
        | ErrorKind::UnknownSchema
        | ErrorKind::SchemaMismatch
        | ErrorKind::Conflict => EXIT_INVALID,
        _ => EXIT_FATAL,
    }
}

/// UMDF - medical data container tool
#[derive(Parser, Debug)]
#[command(name = "umdf")]
#[command(version, about, long_about = None)]
#[command(author = "UMDF Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "umdf.toml", env = "UMDF_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "UMDF_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List registered schemas or show one
    Schemas(commands::schemas::SchemasArgs),

    /// Validate a JSON file against a schema
    Validate(commands::validate_data::ValidateDataArgs),

    /// Write a JSON container document into a new container
    Import(commands::import::ImportArgs),

    /// Show container information
    Info(commands::info::InfoArgs),

    /// Show the audit trail of a module
    Audit(commands::audit::AuditArgs),
}
