//! Object-binding surface
//!
//! One method per engine operation, taking identifiers and passwords as plain
//! strings and returning a serializable [`Outcome`] instead of a Rust error.
//! Host-language wrappers map `Outcome` onto their own result types.
//!
//! # Example
//!
//! ```no_run
//! use umdf::adapters::binding::{Outcome, WriterHandle};
//! use umdf::config::UmdfConfig;
//! use umdf::domain::ModuleData;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let writer = WriterHandle::from_config(&UmdfConfig::default())?;
//! writer.create_new_file("visit.umdf", "dr.smith", None).await;
//!
//! let encounter = writer.create_new_encounter().await;
//! if let Outcome::Success { value: encounter_id } = encounter {
//!     let module = ModuleData::builder("patient").field("name", json!("Jane")).build();
//!     let added = writer.add_module_to_encounter(&encounter_id, "patient", module).await;
//!     println!("{}", serde_json::to_string(&added)?);
//! }
//! writer.close_file().await;
//! # Ok(())
//! # }
//! ```

use super::engine::{create_reader, create_writer, ContainerReader, ContainerWriter};
use crate::config::{secret_string_opt, UmdfConfig};
use crate::domain::{
    EncounterId, ErrorKind, FileInfo, ModuleData, ModuleId, ModuleTrail, Result, UmdfError,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Tagged result of a binding call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Success { value: T },
    Failure { error: String, kind: ErrorKind },
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Returns the success value, if any
    pub fn value(self) -> Option<T> {
        match self {
            Outcome::Success { value } => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    /// Returns the failure kind, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Success { value },
            Err(e) => {
                tracing::debug!(error = %e, kind = ?e.kind(), "Binding call failed");
                Outcome::Failure {
                    error: e.to_string(),
                    kind: e.kind(),
                }
            }
        }
    }
}

fn parse_module_id(id: &str) -> Result<ModuleId> {
    ModuleId::new(id).map_err(UmdfError::Validation)
}

fn parse_encounter_id(id: &str) -> Result<EncounterId> {
    EncounterId::new(id).map_err(UmdfError::Validation)
}

/// Writer handle for host-language bindings
#[derive(Clone)]
pub struct WriterHandle {
    inner: Arc<dyn ContainerWriter>,
}

impl WriterHandle {
    pub fn new(inner: Arc<dyn ContainerWriter>) -> Self {
        Self { inner }
    }

    pub fn from_config(config: &UmdfConfig) -> Result<Self> {
        Ok(Self::new(create_writer(config)?))
    }

    pub async fn create_new_file(
        &self,
        path: &str,
        author: &str,
        password: Option<&str>,
    ) -> Outcome<()> {
        let password = secret_string_opt(password.map(str::to_string));
        self.inner
            .create_new_file(Path::new(path), author, password.as_ref())
            .await
            .into()
    }

    pub async fn open_file(&self, path: &str, author: &str, password: Option<&str>) -> Outcome<()> {
        let password = secret_string_opt(password.map(str::to_string));
        self.inner
            .open_file(Path::new(path), author, password.as_ref())
            .await
            .into()
    }

    /// Returns the new encounter id as a string
    pub async fn create_new_encounter(&self) -> Outcome<String> {
        self.inner
            .create_new_encounter()
            .await
            .map(|id| id.to_string())
            .into()
    }

    pub async fn add_module_to_encounter(
        &self,
        encounter_id: &str,
        schema_path: &str,
        module: ModuleData,
    ) -> Outcome<String> {
        let result = async {
            let encounter_id = parse_encounter_id(encounter_id)?;
            self.inner
                .add_module_to_encounter(encounter_id, schema_path, module)
                .await
        };
        result.await.map(|id| id.to_string()).into()
    }

    pub async fn add_variant_module(
        &self,
        parent_id: &str,
        schema_path: &str,
        module: ModuleData,
    ) -> Outcome<String> {
        let result = async {
            let parent_id = parse_module_id(parent_id)?;
            self.inner
                .add_variant_module(parent_id, schema_path, module)
                .await
        };
        result.await.map(|id| id.to_string()).into()
    }

    pub async fn add_annotation(
        &self,
        parent_id: &str,
        schema_path: &str,
        module: ModuleData,
    ) -> Outcome<String> {
        let result = async {
            let parent_id = parse_module_id(parent_id)?;
            self.inner.add_annotation(parent_id, schema_path, module).await
        };
        result.await.map(|id| id.to_string()).into()
    }

    pub async fn update_module(&self, module_id: &str, module: ModuleData) -> Outcome<()> {
        let result = async {
            let module_id = parse_module_id(module_id)?;
            self.inner.update_module(module_id, module).await
        };
        result.await.into()
    }

    pub async fn close_file(&self) -> Outcome<()> {
        self.inner.close_file().await.into()
    }
}

/// Reader handle for host-language bindings
#[derive(Clone)]
pub struct ReaderHandle {
    inner: Arc<dyn ContainerReader>,
}

impl ReaderHandle {
    pub fn new(inner: Arc<dyn ContainerReader>) -> Self {
        Self { inner }
    }

    pub fn from_config(config: &UmdfConfig) -> Self {
        Self::new(create_reader(config))
    }

    pub async fn open_file(&self, path: &str, password: Option<&str>) -> Outcome<()> {
        let password = secret_string_opt(password.map(str::to_string));
        self.inner
            .open_file(Path::new(path), password.as_ref())
            .await
            .into()
    }

    pub async fn get_file_info(&self) -> Outcome<FileInfo> {
        self.inner.get_file_info().await.into()
    }

    pub async fn get_module_data(&self, module_id: &str) -> Outcome<ModuleData> {
        let result = async {
            let module_id = parse_module_id(module_id)?;
            self.inner.get_module_data(module_id).await
        };
        result.await.into()
    }

    pub async fn get_audit_trail(&self, module_id: &str) -> Outcome<Vec<ModuleTrail>> {
        let result = async {
            let module_id = parse_module_id(module_id)?;
            self.inner.get_audit_trail(module_id).await
        };
        result.await.into()
    }

    pub async fn get_audit_data(&self, trail: &ModuleTrail) -> Outcome<ModuleData> {
        self.inner.get_audit_data(trail).await.into()
    }

    pub async fn close_file(&self) -> Outcome<()> {
        self.inner.close_file().await.into()
    }
}
