//! Container engine capability traits
//!
//! This module defines the operations a container engine exposes to the
//! boundary adapters. The binding surface is written against these traits
//! only, never against a concrete engine.

use crate::config::SecretString;
use crate::domain::{
    Encounter, EncounterId, FileAccessMode, FileInfo, ModuleData, ModuleId, ModuleRelations,
    ModuleTrail, Result,
};
use async_trait::async_trait;
use std::path::Path;

/// Mutating access to one container at a time
#[async_trait]
pub trait ContainerWriter: Send + Sync {
    /// Policy applied by [`create_new_file`](Self::create_new_file)
    fn access_mode(&self) -> FileAccessMode;

    /// Create (or, under `AllowUpdate`, reopen) a container
    ///
    /// # Errors
    ///
    /// `Conflict`, `NotFound`, `AccessDenied` or `InvalidState` depending on
    /// the access policy and handle state.
    async fn create_new_file(
        &self,
        path: &Path,
        author: &str,
        password: Option<&SecretString>,
    ) -> Result<()>;

    /// Open an existing container for incremental update
    async fn open_file(
        &self,
        path: &Path,
        author: &str,
        password: Option<&SecretString>,
    ) -> Result<()>;

    /// Create an empty encounter
    async fn create_new_encounter(&self) -> Result<EncounterId>;

    /// Add a validated module to an encounter
    async fn add_module_to_encounter(
        &self,
        encounter_id: EncounterId,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId>;

    /// Add a validated variant of an existing module
    async fn add_variant_module(
        &self,
        parent_id: ModuleId,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId>;

    /// Add a validated annotation to an existing module
    async fn add_annotation(
        &self,
        parent_id: ModuleId,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId>;

    /// Replace a module's data, recording the replaced state in its audit trail
    async fn update_module(&self, module_id: ModuleId, module: ModuleData) -> Result<()>;

    async fn get_file_info(&self) -> Result<FileInfo>;

    async fn get_module_data(&self, module_id: ModuleId) -> Result<ModuleData>;

    async fn get_audit_trail(&self, module_id: ModuleId) -> Result<Vec<ModuleTrail>>;

    async fn get_audit_data(&self, trail: &ModuleTrail) -> Result<ModuleData>;

    /// Flush and release the container; waits for in-flight mutations
    async fn close_file(&self) -> Result<()>;
}

/// Read-only access to one container at a time
#[async_trait]
pub trait ContainerReader: Send + Sync {
    /// Open a container, checking its password
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing file without a password, `AccessDenied` for
    /// any credential mismatch, `Integrity` for a corrupt container.
    async fn open_file(&self, path: &Path, password: Option<&SecretString>) -> Result<()>;

    async fn get_file_info(&self) -> Result<FileInfo>;

    async fn get_module_data(&self, module_id: ModuleId) -> Result<ModuleData>;

    async fn get_module_ids(&self) -> Result<Vec<ModuleId>>;

    async fn get_module_relations(&self, module_id: ModuleId) -> Result<ModuleRelations>;

    async fn get_encounter(&self, encounter_id: EncounterId) -> Result<Encounter>;

    async fn get_audit_trail(&self, module_id: ModuleId) -> Result<Vec<ModuleTrail>>;

    async fn get_audit_data(&self, trail: &ModuleTrail) -> Result<ModuleData>;

    async fn close_file(&self) -> Result<()>;
}
