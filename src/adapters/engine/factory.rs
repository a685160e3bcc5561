//! Container engine factory
//!
//! Builds writer and reader handles from configuration.

use super::traits::{ContainerReader, ContainerWriter};
use crate::config::UmdfConfig;
use crate::core::container::{Reader, Writer, WriterOptions};
use crate::core::schema::SchemaRegistry;
use crate::domain::Result;
use std::sync::Arc;

/// Create a writer based on the configuration
///
/// # Errors
///
/// Returns an error if the configured schema directory cannot be loaded.
pub fn create_writer(config: &UmdfConfig) -> Result<Arc<dyn ContainerWriter>> {
    let registry = Arc::new(SchemaRegistry::from_config(&config.container)?);
    Ok(create_writer_with(registry, WriterOptions::from(config)))
}

/// Create a writer over an existing registry
pub fn create_writer_with(
    registry: Arc<SchemaRegistry>,
    options: WriterOptions,
) -> Arc<dyn ContainerWriter> {
    tracing::debug!(access_mode = %options.access_mode, "Creating container writer");
    Arc::new(Writer::new(registry, options)) as Arc<dyn ContainerWriter>
}

/// Create a reader based on the configuration
pub fn create_reader(config: &UmdfConfig) -> Arc<dyn ContainerReader> {
    Arc::new(Reader::from_config(config)) as Arc<dyn ContainerReader>
}
