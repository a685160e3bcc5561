//! File access policy resolution
//!
//! Maps the writer's [`FileAccessMode`] and the state of the target path to
//! what `create_new_file` should actually do.

use crate::domain::{FileAccessMode, Result, UmdfError};
use std::path::Path;

/// What a writer does with the target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateIntent {
    /// Write a brand new container; the path is free
    Create,
    /// Discard whatever is at the path and write a new container
    Replace,
    /// Open the existing container and append to it
    Append,
}

/// Resolve the intent of `create_new_file` under `mode`
///
/// The answer is advisory: the path can change before the container is
/// written, so publishing a new container re-checks without replacing.
///
/// # Errors
///
/// - [`UmdfError::Conflict`] for `FailIfExists` when the path exists
/// - [`UmdfError::NotFound`] for `AllowUpdate` when the path does not exist
pub async fn resolve_create(mode: FileAccessMode, path: &Path) -> Result<CreateIntent> {
    let exists = tokio::fs::try_exists(path).await?;
    match (mode, exists) {
        (FileAccessMode::FailIfExists, true) => Err(UmdfError::Conflict(format!(
            "Container already exists: {}",
            path.display()
        ))),
        (FileAccessMode::FailIfExists, false) => Ok(CreateIntent::Create),
        (FileAccessMode::AllowUpdate, true) => Ok(CreateIntent::Append),
        (FileAccessMode::AllowUpdate, false) => Err(UmdfError::NotFound(format!(
            "Container not found: {}",
            path.display()
        ))),
        (FileAccessMode::Overwrite, true) => Ok(CreateIntent::Replace),
        (FileAccessMode::Overwrite, false) => Ok(CreateIntent::Create),
    }
}
