//! In-process engine implementation of the capability traits

use super::traits::{ContainerReader, ContainerWriter};
use crate::config::SecretString;
use crate::core::container::{Reader, Writer};
use crate::domain::{
    Encounter, EncounterId, FileAccessMode, FileInfo, ModuleData, ModuleId, ModuleRelations,
    ModuleTrail, Result,
};
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
impl ContainerWriter for Writer {
    fn access_mode(&self) -> FileAccessMode {
        Writer::access_mode(self)
    }

    async fn create_new_file(
        &self,
        path: &Path,
        author: &str,
        password: Option<&SecretString>,
    ) -> Result<()> {
        Writer::create_new_file(self, path, author, password).await
    }

    async fn open_file(
        &self,
        path: &Path,
        author: &str,
        password: Option<&SecretString>,
    ) -> Result<()> {
        Writer::open_file(self, path, author, password).await
    }

    async fn create_new_encounter(&self) -> Result<EncounterId> {
        Writer::create_new_encounter(self).await
    }

    async fn add_module_to_encounter(
        &self,
        encounter_id: EncounterId,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId> {
        Writer::add_module_to_encounter(self, encounter_id, schema_path, module).await
    }

    async fn add_variant_module(
        &self,
        parent_id: ModuleId,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId> {
        Writer::add_variant_module(self, parent_id, schema_path, module).await
    }

    async fn add_annotation(
        &self,
        parent_id: ModuleId,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId> {
        Writer::add_annotation(self, parent_id, schema_path, module).await
    }

    async fn update_module(&self, module_id: ModuleId, module: ModuleData) -> Result<()> {
        Writer::update_module(self, module_id, module).await
    }

    async fn get_file_info(&self) -> Result<FileInfo> {
        Writer::get_file_info(self).await
    }

    async fn get_module_data(&self, module_id: ModuleId) -> Result<ModuleData> {
        Writer::get_module_data(self, module_id).await
    }

    async fn get_audit_trail(&self, module_id: ModuleId) -> Result<Vec<ModuleTrail>> {
        Writer::get_audit_trail(self, module_id).await
    }

    async fn get_audit_data(&self, trail: &ModuleTrail) -> Result<ModuleData> {
        Writer::get_audit_data(self, trail).await
    }

    async fn close_file(&self) -> Result<()> {
        Writer::close_file(self).await
    }
}

#[async_trait]
impl ContainerReader for Reader {
    async fn open_file(&self, path: &Path, password: Option<&SecretString>) -> Result<()> {
        Reader::open_file(self, path, password).await
    }

    async fn get_file_info(&self) -> Result<FileInfo> {
        Reader::get_file_info(self).await
    }

    async fn get_module_data(&self, module_id: ModuleId) -> Result<ModuleData> {
        Reader::get_module_data(self, module_id).await
    }

    async fn get_module_ids(&self) -> Result<Vec<ModuleId>> {
        Reader::get_module_ids(self).await
    }

    async fn get_module_relations(&self, module_id: ModuleId) -> Result<ModuleRelations> {
        Reader::get_module_relations(self, module_id).await
    }

    async fn get_encounter(&self, encounter_id: EncounterId) -> Result<Encounter> {
        Reader::get_encounter(self, encounter_id).await
    }

    async fn get_audit_trail(&self, module_id: ModuleId) -> Result<Vec<ModuleTrail>> {
        Reader::get_audit_trail(self, module_id).await
    }

    async fn get_audit_data(&self, trail: &ModuleTrail) -> Result<ModuleData> {
        Reader::get_audit_data(self, trail).await
    }

    async fn close_file(&self) -> Result<()> {
        Reader::close_file(self).await
    }
}
