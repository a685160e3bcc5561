//! Writer facade
//!
//! A [`Writer`] owns at most one open container. Every mutation is resolved
//! and validated first, then appended to the journal and applied to the
//! in-memory store in one commit step.
//!
//! # Example
//!
//! ```no_run
//! use umdf::core::container::{Writer, WriterOptions};
//! use umdf::core::schema::SchemaRegistry;
//! use umdf::domain::ModuleData;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> umdf::domain::Result<()> {
//! let writer = Writer::new(Arc::new(SchemaRegistry::builtin()), WriterOptions::default());
//! writer.create_new_file("visit.umdf", "dr.smith", None).await?;
//!
//! let encounter = writer.create_new_encounter().await?;
//! let patient = ModuleData::builder("patient").field("name", json!("Jane")).build();
//! let id = writer.add_module_to_encounter(encounter, "patient", patient).await?;
//!
//! let mut update = writer.get_module_data(id).await?;
//! update.data.insert("name".into(), json!("Jane Doe"));
//! writer.update_module(id, update).await?;
//!
//! writer.close_file().await?;
//! # Ok(())
//! # }
//! ```

use super::format::{ContainerHeader, JournalRecord};
use super::journal::JournalWriter;
use super::session::{
    load_container, lock_for_update, run_blocking, seal_password, OpenContainer,
};
use crate::config::{SecretString, UmdfConfig};
use crate::core::access::{resolve_create, CreateIntent, KdfParams};
use crate::core::schema::{validate_fields, ResolvedSchema, SchemaRegistry};
use crate::core::store::{ModuleLocks, ModuleStore};
use crate::core::verification::checksum::checksum_of;
use crate::domain::{
    Encounter, EncounterId, FileAccessMode, FileInfo, ModuleData, ModuleId, ModuleRelations,
    ModuleTrail, OpenMode, Placement, Result, UmdfError,
};
use crate::log_mutation;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Settings for a writer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Policy applied by `create_new_file`
    pub access_mode: FileAccessMode,
    /// Argon2id cost for new container passwords
    pub kdf: KdfParams,
    /// `sync_data` every journal entry before it is applied
    pub sync_on_commit: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            access_mode: FileAccessMode::default(),
            kdf: KdfParams::default(),
            sync_on_commit: true,
        }
    }
}

impl From<&UmdfConfig> for WriterOptions {
    fn from(config: &UmdfConfig) -> Self {
        Self {
            access_mode: config.container.access_mode,
            kdf: KdfParams::from(&config.security),
            sync_on_commit: config.container.sync_on_commit,
        }
    }
}

struct WriteSession {
    container: OpenContainer,
    author: String,
    journal: Mutex<JournalWriter>,
    locks: ModuleLocks,
}

impl WriteSession {
    fn new(container: OpenContainer, author: &str, journal: JournalWriter) -> Self {
        Self {
            container,
            author: author.to_string(),
            journal: Mutex::new(journal),
            locks: ModuleLocks::new(),
        }
    }

    /// Appends `record` and applies it, holding both the journal and the
    /// store write lock so journal order equals apply order
    async fn commit(&self, record: JournalRecord) -> Result<u64> {
        let mut journal = self.journal.lock().await;
        let mut store = self.container.store.write().await;
        store.check(&record)?;
        let seq = journal.append(&record).await?;
        store.apply(record);
        Ok(seq)
    }
}

/// Container writer
pub struct Writer {
    registry: Arc<SchemaRegistry>,
    options: WriterOptions,
    session: RwLock<Option<WriteSession>>,
}

fn not_open() -> UmdfError {
    UmdfError::InvalidState("No container is open for writing".to_string())
}

impl Writer {
    /// Creates a closed writer
    pub fn new(registry: Arc<SchemaRegistry>, options: WriterOptions) -> Self {
        Self {
            registry,
            options,
            session: RwLock::new(None),
        }
    }

    /// Creates a closed writer from configuration
    ///
    /// # Errors
    ///
    /// Returns [`UmdfError::Configuration`] if the configured schema directory
    /// cannot be loaded.
    pub fn from_config(config: &UmdfConfig) -> Result<Self> {
        let registry = SchemaRegistry::from_config(&config.container)?;
        Ok(Self::new(Arc::new(registry), WriterOptions::from(config)))
    }

    /// Policy applied by the next `create_new_file`
    pub fn access_mode(&self) -> FileAccessMode {
        self.options.access_mode
    }

    /// Sets the policy applied by the next `create_new_file`
    pub fn set_file_access_mode(&mut self, mode: FileAccessMode) {
        self.options.access_mode = mode;
    }

    /// Registry used to resolve and validate schemas
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub async fn is_open(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Creates a container at `path` under the writer's access policy
    ///
    /// An empty password means no password.
    ///
    /// # Errors
    ///
    /// - [`UmdfError::InvalidState`] if a container is already open
    /// - [`UmdfError::Conflict`] under `FailIfExists` when `path` exists, and
    ///   under any mode when another writer holds the container
    /// - [`UmdfError::NotFound`] under `AllowUpdate` when `path` is missing
    /// - [`UmdfError::AccessDenied`] under `AllowUpdate` when the password
    ///   does not match the existing container
    pub async fn create_new_file(
        &self,
        path: impl AsRef<Path>,
        author: &str,
        password: Option<&SecretString>,
    ) -> Result<()> {
        let path = path.as_ref();
        let mut slot = self.session.write().await;
        if slot.is_some() {
            return Err(UmdfError::InvalidState(
                "A container is already open".to_string(),
            ));
        }
        check_author(author)?;

        let intent = resolve_create(self.options.access_mode, path).await?;
        let session = match intent {
            CreateIntent::Append => self.open_session(path, author, password).await?,
            CreateIntent::Create | CreateIntent::Replace => {
                let access = seal_password(password, &self.options.kdf).await?;
                let header = ContainerHeader::new(author, access);
                let replace = self.options.access_mode == FileAccessMode::Overwrite;
                let journal = JournalWriter::create(
                    path,
                    &header,
                    replace,
                    self.options.sync_on_commit,
                )
                .await?;
                let container = OpenContainer::new(
                    path,
                    header,
                    ModuleStore::new(),
                    OpenMode::Write,
                    Some(self.options.access_mode),
                );
                WriteSession::new(container, author, journal)
            }
        };

        tracing::info!(
            path = %path.display(),
            access_mode = %self.options.access_mode,
            intent = ?intent,
            "Container opened for writing"
        );
        *slot = Some(session);
        Ok(())
    }

    /// Opens an existing container for incremental update
    ///
    /// # Errors
    ///
    /// - [`UmdfError::InvalidState`] if a container is already open
    /// - [`UmdfError::NotFound`] if `path` does not exist and no password was given
    /// - [`UmdfError::AccessDenied`] on any password mismatch
    /// - [`UmdfError::Integrity`] if the container is corrupt
    /// - [`UmdfError::Conflict`] if another writer holds the container
    pub async fn open_file(
        &self,
        path: impl AsRef<Path>,
        author: &str,
        password: Option<&SecretString>,
    ) -> Result<()> {
        let path = path.as_ref();
        let mut slot = self.session.write().await;
        if slot.is_some() {
            return Err(UmdfError::InvalidState(
                "A container is already open".to_string(),
            ));
        }
        check_author(author)?;

        let session = self.open_session(path, author, password).await?;
        tracing::info!(path = %path.display(), "Container opened for update");
        *slot = Some(session);
        Ok(())
    }

    async fn open_session(
        &self,
        path: &Path,
        author: &str,
        password: Option<&SecretString>,
    ) -> Result<WriteSession> {
        let lock = lock_for_update(path, password, &self.options.kdf).await?;
        let loaded = load_container(path, password, &self.options.kdf).await?;
        let journal = JournalWriter::append_to(
            path,
            lock,
            loaded.next_seq,
            self.options.sync_on_commit,
        )
        .await?;
        let container = OpenContainer::new(
            path,
            loaded.header,
            loaded.store,
            OpenMode::Write,
            Some(self.options.access_mode),
        );
        Ok(WriteSession::new(container, author, journal))
    }

    /// Creates an empty encounter
    pub async fn create_new_encounter(&self) -> Result<EncounterId> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;

        let encounter_id = EncounterId::generate();
        let seq = session
            .commit(JournalRecord::EncounterCreated {
                encounter_id,
                created_at: Utc::now(),
            })
            .await?;
        log_mutation!("create_new_encounter", encounter_id, seq);
        Ok(encounter_id)
    }

    /// Adds a top-level module to an encounter
    ///
    /// Any id carried by `module` is ignored; the engine assigns one.
    ///
    /// # Errors
    ///
    /// - [`UmdfError::NotFound`] if the encounter does not exist
    /// - [`UmdfError::UnknownSchema`] if `schema_path` does not resolve
    /// - [`UmdfError::SchemaMismatch`] if `module.schema_id` names another schema
    /// - [`UmdfError::SchemaViolation`] if the data does not conform
    pub async fn add_module_to_encounter(
        &self,
        encounter_id: EncounterId,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId> {
        self.add_module(Placement::Encounter { encounter_id }, schema_path, module)
            .await
    }

    /// Adds a variant of `parent_id`
    ///
    /// Fails with [`UmdfError::NotFound`] if the parent does not exist;
    /// otherwise as [`add_module_to_encounter`](Self::add_module_to_encounter).
    pub async fn add_variant_module(
        &self,
        parent_id: ModuleId,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId> {
        self.add_module(Placement::Variant { parent_id }, schema_path, module)
            .await
    }

    /// Adds an annotation to `parent_id`; the parent's data is not touched
    pub async fn add_annotation(
        &self,
        parent_id: ModuleId,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId> {
        self.add_module(Placement::Annotation { parent_id }, schema_path, module)
            .await
    }

    async fn add_module(
        &self,
        placement: Placement,
        schema_path: &str,
        module: ModuleData,
    ) -> Result<ModuleId> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;
        let _parent_guard = match placement.parent() {
            Some(parent) => Some(session.locks.acquire(parent).await),
            None => None,
        };

        session.container.store.read().await.encounter_for(&placement)?;

        let resolved = self.resolve_schema(schema_path).await?;
        let requested = module.schema_id.trim();
        if !requested.is_empty() && requested != resolved.schema_id {
            return Err(UmdfError::SchemaMismatch {
                expected: resolved.schema_id,
                found: requested.to_string(),
            });
        }
        validate_fields(&resolved.definition, &module.data)?;

        let id = ModuleId::generate();
        let kind = placement.kind();
        let record = JournalRecord::ModuleAdded {
            module: ModuleData {
                id: Some(id),
                schema_id: resolved.schema_id,
                data: module.data,
                metadata: module.metadata,
            },
            schema_path: resolved.schema_path,
            placement,
            created_at: Utc::now(),
            author: session.author.clone(),
        };
        let seq = session.commit(record).await?;
        tracing::debug!(module_id = %id, kind = %kind, "Module added");
        log_mutation!("add_module", id, seq);
        Ok(id)
    }

    /// Registered ids resolve in memory; file references are read off the
    /// async worker threads
    async fn resolve_schema(&self, schema_ref: &str) -> Result<ResolvedSchema> {
        if self.registry.contains(schema_ref.trim()) {
            return self.registry.resolve(schema_ref);
        }
        let registry = Arc::clone(&self.registry);
        let schema_ref = schema_ref.to_string();
        run_blocking(move || registry.resolve(&schema_ref)).await
    }

    /// Replaces a module's data and metadata, recording the replaced state in
    /// its audit trail
    ///
    /// # Errors
    ///
    /// - [`UmdfError::NotFound`] if the module does not exist
    /// - [`UmdfError::Validation`] if `module.id` is set and differs from `module_id`
    /// - [`UmdfError::SchemaMismatch`] if `module.schema_id` is set and differs
    ///   from the stored schema id
    /// - [`UmdfError::SchemaViolation`] if the new data does not conform
    pub async fn update_module(&self, module_id: ModuleId, module: ModuleData) -> Result<()> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;
        let _guard = session.locks.acquire(module_id).await;

        if let Some(supplied) = module.id {
            if supplied != module_id {
                return Err(UmdfError::Validation(format!(
                    "Module id {supplied} does not match update target {module_id}"
                )));
            }
        }

        let (trail, schema_id, schema_path) = {
            let store = session.container.store.read().await;
            let current = store.module(&module_id)?;
            let requested = module.schema_id.trim();
            if !requested.is_empty() && requested != current.data.schema_id {
                return Err(UmdfError::SchemaMismatch {
                    expected: current.data.schema_id.clone(),
                    found: requested.to_string(),
                });
            }
            let trail = ModuleTrail {
                module_id,
                version: current.version,
                recorded_at: Utc::now(),
                author: session.author.clone(),
                checksum: checksum_of(&current.data)?,
            };
            (
                trail,
                current.data.schema_id.clone(),
                current.schema_path.clone(),
            )
        };

        let definition = match self.registry.get(&schema_id) {
            Some(definition) => definition,
            None => self.resolve_schema(&schema_path).await?.definition,
        };
        validate_fields(&definition, &module.data)?;

        let version = trail.superseded_by();
        let seq = session
            .commit(JournalRecord::ModuleUpdated {
                trail,
                data: module.data,
                metadata: module.metadata,
            })
            .await?;
        tracing::debug!(module_id = %module_id, version, "Module updated");
        log_mutation!("update_module", module_id, seq);
        Ok(())
    }

    /// Describes the open container
    pub async fn get_file_info(&self) -> Result<FileInfo> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;
        Ok(session.container.file_info().await)
    }

    /// Current state of a module
    pub async fn get_module_data(&self, module_id: ModuleId) -> Result<ModuleData> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;
        let store = session.container.store.read().await;
        store.module_data(&module_id)
    }

    /// Every module id in creation order
    pub async fn get_module_ids(&self) -> Result<Vec<ModuleId>> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;
        let store = session.container.store.read().await;
        Ok(store.module_ids())
    }

    /// Variants and annotations of a module
    pub async fn get_module_relations(&self, module_id: ModuleId) -> Result<ModuleRelations> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;
        let store = session.container.store.read().await;
        store.relations(&module_id)
    }

    /// An encounter and its member modules
    pub async fn get_encounter(&self, encounter_id: EncounterId) -> Result<Encounter> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;
        let store = session.container.store.read().await;
        store.encounter(&encounter_id).cloned()
    }

    /// Audit entries of a module, oldest first
    pub async fn get_audit_trail(&self, module_id: ModuleId) -> Result<Vec<ModuleTrail>> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;
        let store = session.container.store.read().await;
        store.audit_trail(&module_id)
    }

    /// The module as preserved by `trail`
    pub async fn get_audit_data(&self, trail: &ModuleTrail) -> Result<ModuleData> {
        let slot = self.session.read().await;
        let session = slot.as_ref().ok_or_else(not_open)?;
        let store = session.container.store.read().await;
        store.audit_data(trail)
    }

    /// Closes the container
    ///
    /// Waits for in-flight mutations to commit, then flushes the journal.
    pub async fn close_file(&self) -> Result<()> {
        let mut slot = self.session.write().await;
        let session = slot.take().ok_or_else(not_open)?;
        let path = session.container.path.clone();
        session.journal.into_inner().finish().await?;
        tracing::info!(path = %path.display(), "Container closed");
        Ok(())
    }
}

fn check_author(author: &str) -> Result<()> {
    if author.trim().is_empty() {
        return Err(UmdfError::Validation("Author must not be empty".to_string()));
    }
    Ok(())
}
