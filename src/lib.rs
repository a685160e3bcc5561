// UMDF - Unified Medical Data Format container tool
// Copyright (c) 2025 UMDF Contributors
// Licensed under the MIT License

//! # UMDF - Unified Medical Data Format
//!
//! UMDF stores clinical data in a single container file. A container holds
//! encounters; an encounter holds schema-validated modules; modules carry
//! variants and annotations. Every update keeps the replaced state in an
//! append-only audit trail.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Engine: schemas, module store, audit trail, container journal
//! - [`adapters`] - Engine traits, the string-typed binding and the flat surface
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use umdf::config::load_config_or_default;
//! use umdf::core::container::Writer;
//! use umdf::domain::ModuleData;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("umdf.toml")?;
//!     let writer = Writer::from_config(&config)?;
//!
//!     writer.create_new_file("visit.umdf", "dr.smith", None).await?;
//!     let encounter = writer.create_new_encounter().await?;
//!
//!     let patient = ModuleData::builder("patient")
//!         .field("name", json!("Jane"))
//!         .build();
//!     let module_id = writer
//!         .add_module_to_encounter(encounter, "patient", patient)
//!         .await?;
//!
//!     let corrected = ModuleData::builder("patient")
//!         .field("name", json!("Jane Doe"))
//!         .build();
//!     writer.update_module(module_id, corrected).await?;
//!
//!     // One entry per update, holding the replaced state
//!     let trail = writer.get_audit_trail(module_id).await?;
//!     assert_eq!(trail.len(), 1);
//!
//!     writer.close_file().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], carrying a
//! [`domain::UmdfError`]. Each error maps to a stable [`domain::ErrorKind`]
//! that the binding layer reports to callers.
//!
//! ## Logging
//!
//! UMDF logs with the `tracing` crate. Binaries install a subscriber with
//! [`logging::init_logging`]; library users bring their own.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
