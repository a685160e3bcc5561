//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod audit;
pub mod import;
pub mod info;
pub mod init;
pub mod schemas;
pub mod validate;
pub mod validate_data;
