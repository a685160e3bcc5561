//! Flat boolean surface
//!
//! Whole-document entry points for callers that only need pass/fail. Every
//! call builds its own handle, goes through the same writer/reader state
//! machine and validator as the rest of the engine, and reports diagnostics
//! through `tracing` rather than its return value.

use super::engine::{create_writer_with, ContainerWriter};
use crate::config::SecretString;
use crate::core::access::resolve_create;
use crate::core::container::journal::{publish_error, stage_file};
use crate::core::container::{run_blocking, ContainerLock, Reader, WriterOptions};
use crate::core::schema::{SchemaRegistry, SchemaValidator};
use crate::domain::{EncounterId, FieldMap, FileAccessMode, ModuleData, ModuleId, Result, UmdfError};
use crate::log_error_with_context;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

fn default_author() -> String {
    "umdf".to_string()
}

/// A whole container described as JSON
///
/// ```json
/// {
///   "author": "dr.smith",
///   "encounters": [
///     {"modules": [
///       {"schema_id": "patient", "data": {"name": "Jane"},
///        "annotations": [{"schema_id": "patient", "data": {"name": "J."}}]}
///     ]}
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDocument {
    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default)]
    pub encounters: Vec<DocumentEncounter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentEncounter {
    #[serde(default)]
    pub modules: Vec<DocumentModule>,
}

/// One module with its variant and annotation subtrees
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentModule {
    #[serde(default)]
    pub schema_id: String,

    /// Schema reference used for resolution; defaults to `schema_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,

    #[serde(default)]
    pub data: FieldMap,

    #[serde(default)]
    pub metadata: FieldMap,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<DocumentModule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<DocumentModule>,
}

impl DocumentModule {
    fn schema_ref(&self) -> Result<&str> {
        let reference = self
            .schema_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.schema_id);
        if reference.trim().is_empty() {
            return Err(UmdfError::Validation(
                "Document module has neither schema_path nor schema_id".to_string(),
            ));
        }
        Ok(reference)
    }

    fn to_module(&self) -> ModuleData {
        ModuleData {
            id: None,
            schema_id: self.schema_id.clone(),
            data: self.data.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Counts of what a document import wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub encounters: usize,
    pub modules: usize,
}

#[derive(Clone, Copy)]
enum Attach {
    Encounter(EncounterId),
    Variant(ModuleId),
    Annotation(ModuleId),
}

/// Writes a document into a new container through `writer`
///
/// The writer's access policy decides what happens to an existing file. The
/// container is closed on success and on failure.
pub async fn write_document(
    writer: &dyn ContainerWriter,
    document: &ContainerDocument,
    output_path: &Path,
    password: Option<&SecretString>,
) -> Result<ImportSummary> {
    writer
        .create_new_file(output_path, &document.author, password)
        .await?;

    let written = write_contents(writer, document).await;
    let closed = writer.close_file().await;
    let summary = written?;
    closed?;
    Ok(summary)
}

/// Writes a document so that a failed write leaves `output_path` untouched
///
/// Under `FailIfExists` and `Overwrite` the container is built in a staged
/// sibling file and moved onto `output_path` only after every module has been
/// written. `AllowUpdate` appends to the existing container entry by entry.
pub async fn write_document_staged(
    registry: Arc<SchemaRegistry>,
    options: WriterOptions,
    document: &ContainerDocument,
    output_path: &Path,
    password: Option<&SecretString>,
) -> Result<ImportSummary> {
    if options.access_mode == FileAccessMode::AllowUpdate {
        let writer = create_writer_with(registry, options);
        return write_document(writer.as_ref(), document, output_path, password).await;
    }
    resolve_create(options.access_mode, output_path).await?;

    let target = output_path.to_path_buf();
    let staged = run_blocking(move || Ok(stage_file(&target)?.into_temp_path())).await?;

    let staging_options = WriterOptions {
        access_mode: FileAccessMode::Overwrite,
        ..options
    };
    let writer = create_writer_with(registry, staging_options);
    let summary = write_document(writer.as_ref(), document, &staged, password).await?;

    let replace = options.access_mode == FileAccessMode::Overwrite;
    let _previous = if replace {
        ContainerLock::acquire_if_exists(output_path).await?
    } else {
        None
    };
    let target = output_path.to_path_buf();
    run_blocking(move || {
        let published = if replace {
            staged.persist(&target)
        } else {
            staged.persist_noclobber(&target)
        };
        published.map_err(|e| publish_error(e.error, &target))
    })
    .await?;

    Ok(summary)
}

async fn write_contents(
    writer: &dyn ContainerWriter,
    document: &ContainerDocument,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let mut pending: VecDeque<(Attach, &DocumentModule)> = VecDeque::new();

    for encounter in &document.encounters {
        let encounter_id = writer.create_new_encounter().await?;
        summary.encounters += 1;
        pending.extend(
            encounter
                .modules
                .iter()
                .map(|module| (Attach::Encounter(encounter_id), module)),
        );
    }

    while let Some((attach, entry)) = pending.pop_front() {
        let schema_ref = entry.schema_ref()?;
        let module = entry.to_module();
        let id = match attach {
            Attach::Encounter(encounter_id) => {
                writer
                    .add_module_to_encounter(encounter_id, schema_ref, module)
                    .await?
            }
            Attach::Variant(parent_id) => {
                writer.add_variant_module(parent_id, schema_ref, module).await?
            }
            Attach::Annotation(parent_id) => {
                writer.add_annotation(parent_id, schema_ref, module).await?
            }
        };
        summary.modules += 1;
        pending.extend(entry.variants.iter().map(|v| (Attach::Variant(id), v)));
        pending.extend(entry.annotations.iter().map(|a| (Attach::Annotation(id), a)));
    }

    Ok(summary)
}

/// Writes a JSON container document to `output_path`, replacing any file there
///
/// A document that fails part way leaves an existing file as it was.
pub async fn write_umdf_file(json_data: &str, output_path: &str) -> bool {
    let document: ContainerDocument = match serde_json::from_str(json_data) {
        Ok(document) => document,
        Err(e) => {
            let error = UmdfError::from(e);
            log_error_with_context!(&error, "Failed to parse container document");
            return false;
        }
    };

    let options = WriterOptions {
        access_mode: FileAccessMode::Overwrite,
        ..WriterOptions::default()
    };
    let registry = Arc::new(SchemaRegistry::builtin());

    match write_document_staged(registry, options, &document, Path::new(output_path), None).await {
        Ok(summary) => {
            tracing::info!(
                path = output_path,
                encounters = summary.encounters,
                modules = summary.modules,
                "Container written"
            );
            true
        }
        Err(e) => {
            log_error_with_context!(&e, "Failed to write UMDF file");
            false
        }
    }
}

/// Opens and fully verifies an unauthenticated container
pub async fn read_umdf_file(file_path: &str) -> bool {
    let reader = Reader::default();
    let result = async {
        reader.open_file(file_path, None).await?;
        let info = reader.get_file_info().await;
        reader.close_file().await?;
        info
    }
    .await;

    match result {
        Ok(info) => {
            tracing::info!(
                path = file_path,
                encounters = info.encounter_count,
                modules = info.module_count,
                "Container read"
            );
            true
        }
        Err(e) => {
            log_error_with_context!(&e, "Failed to read UMDF file");
            false
        }
    }
}

/// Returns the built-in schema ids as a JSON array
pub fn get_supported_schemas() -> String {
    let schemas = SchemaRegistry::builtin().supported_schemas();
    serde_json::to_string(&schemas).unwrap_or_else(|_| "[]".to_string())
}

/// Validates a JSON document against a built-in schema
pub fn validate_schema(schema_id: &str, json_data: &str) -> bool {
    let registry = Arc::new(SchemaRegistry::builtin());
    let validator = SchemaValidator::new(registry);

    let result = serde_json::from_str::<serde_json::Value>(json_data)
        .map_err(UmdfError::from)
        .and_then(|data| validator.validate(schema_id, &data));

    match result {
        Ok(()) => true,
        Err(e) => {
            log_error_with_context!(&e, "Schema validation failed");
            false
        }
    }
}
