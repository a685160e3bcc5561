//! Schema registry
//!
//! Holds the schemas a writer can validate against, keyed by schema id, and
//! resolves the schema references callers pass when adding modules.
//!
//! # Resolution order
//!
//! 1. A registered schema id (`"patient"`)
//! 2. A readable schema file, absolute or relative to the schema directory
//! 3. An id derived from a path of the form `<dir>/<name>/v<version>.json`
//!    or `<dir>/<name>.json`, when that id is registered
//!
//! Anything else is [`UmdfError::UnknownSchema`].

use super::builtin::builtin_schemas;
use super::definition::SchemaDefinition;
use crate::config::ContainerConfig;
use crate::domain::{Result, UmdfError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A schema reference resolved to a concrete definition
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    /// Canonical schema id recorded on the module
    pub schema_id: String,
    /// Reference as the caller supplied it, recorded as the module's schema path
    pub schema_path: String,
    /// Definition used for validation
    pub definition: Arc<SchemaDefinition>,
}

/// Registry of known schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<SchemaDefinition>>,
    schema_dir: Option<PathBuf>,
}

impl SchemaRegistry {
    /// Creates an empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in schemas
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (id, definition) in builtin_schemas() {
            registry.register(id, definition);
        }
        registry
    }

    /// Creates the registry described by the container configuration
    ///
    /// Starts from the built-in schemas and, when `schema_dir` is set, loads
    /// every `*.json` file beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`UmdfError::Configuration`] if the directory cannot be read or
    /// a schema file cannot be parsed.
    pub fn from_config(config: &ContainerConfig) -> Result<Self> {
        let mut registry = Self::builtin();
        if let Some(dir) = &config.schema_dir {
            registry = registry.with_schema_dir(dir)?;
        }
        Ok(registry)
    }

    /// Loads all schemas under `dir` and uses it as the base for relative
    /// schema paths
    pub fn with_schema_dir(mut self, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(UmdfError::Configuration(format!(
                "Schema directory does not exist: {}",
                dir.display()
            )));
        }
        let loaded = self.load_dir(dir)?;
        tracing::debug!(dir = %dir.display(), count = loaded, "Loaded schema directory");
        self.schema_dir = Some(dir.to_path_buf());
        Ok(self)
    }

    /// Registers (or replaces) a schema under `id`
    pub fn register(&mut self, id: impl Into<String>, definition: SchemaDefinition) {
        self.schemas.insert(id.into(), Arc::new(definition));
    }

    /// Returns the schema registered under `id`
    pub fn get(&self, id: &str) -> Option<Arc<SchemaDefinition>> {
        self.schemas.get(id).cloned()
    }

    /// Returns true if `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Returns the registered schema ids in sorted order
    pub fn supported_schemas(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }

    /// Resolves a schema reference
    ///
    /// # Errors
    ///
    /// - [`UmdfError::UnknownSchema`] if the reference matches nothing
    /// - [`UmdfError::Configuration`] if a referenced schema file is malformed
    pub fn resolve(&self, schema_ref: &str) -> Result<ResolvedSchema> {
        let schema_ref = schema_ref.trim();
        if schema_ref.is_empty() {
            return Err(UmdfError::UnknownSchema("<empty>".to_string()));
        }

        if let Some(definition) = self.get(schema_ref) {
            return Ok(ResolvedSchema {
                schema_id: schema_ref.to_string(),
                schema_path: schema_ref.to_string(),
                definition,
            });
        }

        let derived = schema_id_from_path(Path::new(schema_ref));

        if let Some(file) = self.locate(schema_ref) {
            let definition = read_schema_file(&file)?;
            let schema_id = declared_simple_id(&definition)
                .or(derived)
                .ok_or_else(|| UmdfError::UnknownSchema(schema_ref.to_string()))?;
            return Ok(ResolvedSchema {
                schema_id,
                schema_path: schema_ref.to_string(),
                definition: Arc::new(definition),
            });
        }

        if let Some(id) = derived {
            if let Some(definition) = self.get(&id) {
                return Ok(ResolvedSchema {
                    schema_id: id,
                    schema_path: schema_ref.to_string(),
                    definition,
                });
            }
        }

        Err(UmdfError::UnknownSchema(schema_ref.to_string()))
    }

    fn locate(&self, schema_ref: &str) -> Option<PathBuf> {
        let path = Path::new(schema_ref);
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        if path.is_relative() {
            if let Some(dir) = &self.schema_dir {
                let joined = dir.join(path);
                if joined.is_file() {
                    return Some(joined);
                }
            }
        }
        None
    }

    fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| {
                UmdfError::Configuration(format!("Cannot read {}: {e}", dir.display()))
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        entries.sort();

        for path in entries {
            if path.is_dir() {
                loaded += self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "json") {
                let definition = read_schema_file(&path)?;
                let Some(id) = declared_simple_id(&definition).or_else(|| schema_id_from_path(&path))
                else {
                    tracing::warn!(file = %path.display(), "Skipping schema without usable id");
                    continue;
                };
                self.register(id, definition);
                loaded += 1;
            }
        }
        Ok(loaded)
    }
}

fn read_schema_file(path: &Path) -> Result<SchemaDefinition> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        UmdfError::Configuration(format!("Cannot read schema {}: {e}", path.display()))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        UmdfError::Configuration(format!("Invalid schema {}: {e}", path.display()))
    })
}

/// `$id` values that are plain names rather than URIs
fn declared_simple_id(definition: &SchemaDefinition) -> Option<String> {
    definition
        .declared_id
        .as_deref()
        .filter(|id| !id.is_empty() && !id.contains(['/', ':', '#']))
        .map(str::to_string)
}

fn is_version_stem(stem: &str) -> bool {
    let mut chars = stem.chars();
    matches!(chars.next(), Some('v' | 'V')) && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Derives a schema id from a schema file path
///
/// `schemas/patient/v1.0.json` and `schemas/patient.json` both map to
/// `patient`.
pub fn schema_id_from_path(path: &Path) -> Option<String> {
    if path.extension().is_some_and(|ext| ext != "json") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if is_version_stem(stem) {
        let parent = path.parent()?.file_name()?.to_str()?;
        Some(parent.to_string())
    } else {
        Some(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_supported_schemas_sorted() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(
            registry.supported_schemas(),
            ["imaging", "lab_results", "medication", "patient"]
        );
    }

    #[test]
    fn test_resolve_by_id() {
        let resolved = SchemaRegistry::builtin().resolve("patient").unwrap();
        assert_eq!(resolved.schema_id, "patient");
        assert_eq!(resolved.schema_path, "patient");
    }

    #[test]
    fn test_resolve_by_conventional_path() {
        let resolved = SchemaRegistry::builtin()
            .resolve("./schemas/lab_results/v1.0.json")
            .unwrap();
        assert_eq!(resolved.schema_id, "lab_results");
        assert_eq!(resolved.schema_path, "./schemas/lab_results/v1.0.json");
    }

    #[test]
    fn test_resolve_unknown() {
        let result = SchemaRegistry::builtin().resolve("genomics");
        assert!(matches!(result, Err(UmdfError::UnknownSchema(_))));
        let result = SchemaRegistry::builtin().resolve("");
        assert!(matches!(result, Err(UmdfError::UnknownSchema(_))));
    }

    #[test]
    fn test_schema_dir_loading_and_relative_resolution() {
        let dir = TempDir::new().unwrap();
        let vitals = dir.path().join("vitals");
        std::fs::create_dir_all(&vitals).unwrap();
        std::fs::write(
            vitals.join("v1.0.json"),
            json!({"type": "object", "required": ["pulse"]}).to_string(),
        )
        .unwrap();

        let registry = SchemaRegistry::builtin().with_schema_dir(dir.path()).unwrap();
        assert!(registry.contains("vitals"));

        let resolved = registry.resolve("vitals/v1.0.json").unwrap();
        assert_eq!(resolved.schema_id, "vitals");
        assert_eq!(resolved.definition.required_fields(), ["pulse"]);
    }

    #[test]
    fn test_missing_schema_dir() {
        let result = SchemaRegistry::builtin().with_schema_dir("/definitely/not/here");
        assert!(matches!(result, Err(UmdfError::Configuration(_))));
    }

    #[test]
    fn test_schema_id_from_path() {
        assert_eq!(
            schema_id_from_path(Path::new("schemas/imaging/v2.json")).as_deref(),
            Some("imaging")
        );
        assert_eq!(
            schema_id_from_path(Path::new("medication.json")).as_deref(),
            Some("medication")
        );
        assert_eq!(schema_id_from_path(Path::new("notes.txt")), None);
    }
}
