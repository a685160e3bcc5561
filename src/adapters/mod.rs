//! Boundary adapters over the container engine.
//!
//! - [`engine`] - Capability traits, in-process implementation and factory
//! - [`binding`] - Object-binding surface returning tagged [`binding::Outcome`] values
//! - [`flat`] - Whole-document boolean surface
//!
//! # Design Pattern
//!
//! Adapters isolate callers from the concrete engine. The binding surface
//! holds `Arc<dyn ContainerWriter>` / `Arc<dyn ContainerReader>` handles built
//! by the factory, so a different engine can stand behind the same surface.
//!
//! ```rust,no_run
//! use umdf::adapters::engine::create_reader;
//! use umdf::config::UmdfConfig;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = create_reader(&UmdfConfig::default());
//! reader.open_file(Path::new("visit.umdf"), None).await?;
//! let info = reader.get_file_info().await?;
//! println!("{} modules", info.module_count);
//! reader.close_file().await?;
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod engine;
pub mod flat;
