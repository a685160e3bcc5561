//! Reader facade
//!
//! Opens a container read-only and answers queries from the replayed state.
//! A reader never writes to the file.

use super::session::{load_container, OpenContainer};
use crate::config::{SecretString, UmdfConfig};
use crate::core::access::KdfParams;
use crate::domain::{
    Encounter, EncounterId, FileInfo, ModuleData, ModuleId, ModuleRelations, ModuleTrail,
    OpenMode, Result, UmdfError,
};
use std::path::Path;
use tokio::sync::RwLock;

/// Container reader
pub struct Reader {
    kdf: KdfParams,
    session: RwLock<Option<OpenContainer>>,
}

fn not_open() -> UmdfError {
    UmdfError::InvalidState("No container is open for reading".to_string())
}

impl Default for Reader {
    fn default() -> Self {
        Self::new(KdfParams::default())
    }
}

impl Reader {
    /// Creates a closed reader
    ///
    /// `kdf` only sizes the decoy verification run when a password is
    /// supplied for a missing container; stored hashes carry their own cost.
    pub fn new(kdf: KdfParams) -> Self {
        Self {
            kdf,
            session: RwLock::new(None),
        }
    }

    pub fn from_config(config: &UmdfConfig) -> Self {
        Self::new(KdfParams::from(&config.security))
    }

    pub async fn is_open(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Opens a container for reading
    ///
    /// # Errors
    ///
    /// - [`UmdfError::InvalidState`] if a container is already open
    /// - [`UmdfError::NotFound`] if `path` does not exist and no password was given
    /// - [`UmdfError::AccessDenied`] on any password mismatch
    /// - [`UmdfError::Integrity`] if the container is corrupt
    pub async fn open_file(
        &self,
        path: impl AsRef<Path>,
        password: Option<&SecretString>,
    ) -> Result<()> {
        let path = path.as_ref();
        let mut slot = self.session.write().await;
        if slot.is_some() {
            return Err(UmdfError::InvalidState(
                "A container is already open".to_string(),
            ));
        }

        let loaded = load_container(path, password, &self.kdf).await?;
        let container =
            OpenContainer::new(path, loaded.header, loaded.store, OpenMode::Read, None);
        tracing::info!(path = %path.display(), "Container opened for reading");
        *slot = Some(container);
        Ok(())
    }

    pub async fn get_file_info(&self) -> Result<FileInfo> {
        let slot = self.session.read().await;
        let container = slot.as_ref().ok_or_else(not_open)?;
        Ok(container.file_info().await)
    }

    pub async fn get_module_data(&self, module_id: ModuleId) -> Result<ModuleData> {
        let slot = self.session.read().await;
        let container = slot.as_ref().ok_or_else(not_open)?;
        let store = container.store.read().await;
        store.module_data(&module_id)
    }

    pub async fn get_module_ids(&self) -> Result<Vec<ModuleId>> {
        let slot = self.session.read().await;
        let container = slot.as_ref().ok_or_else(not_open)?;
        let store = container.store.read().await;
        Ok(store.module_ids())
    }

    pub async fn get_module_relations(&self, module_id: ModuleId) -> Result<ModuleRelations> {
        let slot = self.session.read().await;
        let container = slot.as_ref().ok_or_else(not_open)?;
        let store = container.store.read().await;
        store.relations(&module_id)
    }

    pub async fn get_encounter(&self, encounter_id: EncounterId) -> Result<Encounter> {
        let slot = self.session.read().await;
        let container = slot.as_ref().ok_or_else(not_open)?;
        let store = container.store.read().await;
        store.encounter(&encounter_id).cloned()
    }

    /// Audit entries of a module, oldest first
    pub async fn get_audit_trail(&self, module_id: ModuleId) -> Result<Vec<ModuleTrail>> {
        let slot = self.session.read().await;
        let container = slot.as_ref().ok_or_else(not_open)?;
        let store = container.store.read().await;
        store.audit_trail(&module_id)
    }

    /// The module as preserved by `trail`
    ///
    /// Repeated calls with the same entry return identical data.
    pub async fn get_audit_data(&self, trail: &ModuleTrail) -> Result<ModuleData> {
        let slot = self.session.read().await;
        let container = slot.as_ref().ok_or_else(not_open)?;
        let store = container.store.read().await;
        store.audit_data(trail)
    }

    pub async fn close_file(&self) -> Result<()> {
        let mut slot = self.session.write().await;
        let container = slot.take().ok_or_else(not_open)?;
        tracing::info!(path = %container.path.display(), "Container closed");
        Ok(())
    }
}
