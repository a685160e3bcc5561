//! Container engine abstraction layer
//!
//! This module provides trait-based abstractions over the container engine,
//! the in-process implementation, and factory functions building handles from
//! configuration.

pub mod factory;
pub mod local;
pub mod traits;

pub use factory::{create_reader, create_writer, create_writer_with};
pub use traits::{ContainerReader, ContainerWriter};
