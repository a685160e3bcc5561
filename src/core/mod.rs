//! Core engine for UMDF containers.
//!
//! # Modules
//!
//! - [`access`] - Password hashing and file access policy
//! - [`schema`] - Schema registry and structural validation
//! - [`store`] - In-memory module tree and per-module locks
//! - [`audit`] - Append-only audit history with immutable snapshots
//! - [`container`] - On-disk journal and the writer/reader facades
//! - [`verification`] - Canonical checksums
//!
//! # Mutation Workflow
//!
//! 1. **Lock**: take the per-id lock of the target module or parent
//! 2. **Resolve**: map the schema reference to a registered definition
//! 3. **Validate**: check the payload against the schema
//! 4. **Journal**: append the sealed record to the container file
//! 5. **Apply**: update the module store and audit trail in memory
//!
//! # Example
//!
//! ```rust,no_run
//! use umdf::config::load_config;
//! use umdf::core::container::{Reader, Writer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("umdf.toml")?;
//!
//! let writer = Writer::from_config(&config)?;
//! writer.create_new_file("visit.umdf", "dr.smith", None).await?;
//! let encounter = writer.create_new_encounter().await?;
//! writer.close_file().await?;
//!
//! let reader = Reader::from_config(&config);
//! reader.open_file("visit.umdf", None).await?;
//! let info = reader.get_file_info().await?;
//! println!("Encounters: {}", info.encounter_count);
//! # let _ = encounter;
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod audit;
pub mod container;
pub mod schema;
pub mod store;
pub mod verification;
