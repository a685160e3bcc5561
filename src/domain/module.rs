//! Module domain model
//!
//! A module is a typed data unit inside a container. Top-level modules belong to
//! an encounter; variants and annotations hang off a parent module and inherit
//! its encounter.

use super::ids::{EncounterId, ModuleId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name to JSON value mapping used for module `data` and `metadata`
pub type FieldMap = Map<String, Value>;

/// A typed, schema-validated data unit
///
/// `id` is assigned by the engine; callers leave it empty when adding a module.
/// `schema_id` may also be left empty on input, in which case the engine fills
/// it from the resolved schema.
///
/// # Examples
///
/// ```
/// use umdf::domain::module::ModuleData;
/// use serde_json::json;
///
/// let module = ModuleData::builder("patient")
///     .field("patient_id", json!("P-001"))
///     .field("name", json!("Jane"))
///     .metadata("source", json!("intake-form"))
///     .build();
///
/// assert!(module.id.is_none());
/// assert_eq!(module.data["name"], json!("Jane"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleData {
    /// Engine-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ModuleId>,

    /// Schema identifier, immutable after creation
    #[serde(default)]
    pub schema_id: String,

    /// Schema-conformant payload
    #[serde(default)]
    pub data: FieldMap,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: FieldMap,
}

impl ModuleData {
    /// Creates an empty module for the given schema
    pub fn new(schema_id: impl Into<String>) -> Self {
        Self {
            id: None,
            schema_id: schema_id.into(),
            data: FieldMap::new(),
            metadata: FieldMap::new(),
        }
    }

    /// Creates a new builder for constructing a ModuleData
    pub fn builder(schema_id: impl Into<String>) -> ModuleDataBuilder {
        ModuleDataBuilder::new(schema_id)
    }
}

/// Builder for constructing ModuleData instances
#[derive(Debug)]
pub struct ModuleDataBuilder {
    module: ModuleData,
}

impl ModuleDataBuilder {
    /// Creates a new builder
    pub fn new(schema_id: impl Into<String>) -> Self {
        Self {
            module: ModuleData::new(schema_id),
        }
    }

    /// Sets a single data field
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.module.data.insert(name.into(), value);
        self
    }

    /// Replaces the data payload with the fields of a JSON object
    ///
    /// Non-object values leave the payload empty.
    pub fn data(mut self, data: Value) -> Self {
        self.module.data = match data {
            Value::Object(map) => map,
            _ => FieldMap::new(),
        };
        self
    }

    /// Sets a single metadata field
    pub fn metadata(mut self, name: impl Into<String>, value: Value) -> Self {
        self.module.metadata.insert(name.into(), value);
        self
    }

    /// Builds the ModuleData
    pub fn build(self) -> ModuleData {
        self.module
    }
}

/// How a module is attached to the container tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Top-level member of an encounter
    Encounter { encounter_id: EncounterId },
    /// Alternate/derived version of a parent module
    Variant { parent_id: ModuleId },
    /// Non-authoritative commentary on a parent module
    Annotation { parent_id: ModuleId },
}

impl Placement {
    /// Returns the parent module, if any
    pub fn parent(&self) -> Option<ModuleId> {
        match self {
            Placement::Encounter { .. } => None,
            Placement::Variant { parent_id } | Placement::Annotation { parent_id } => {
                Some(*parent_id)
            }
        }
    }

    /// Returns the kind of module this placement produces
    pub fn kind(&self) -> ModuleKind {
        match self {
            Placement::Encounter { .. } => ModuleKind::Primary,
            Placement::Variant { .. } => ModuleKind::Variant,
            Placement::Annotation { .. } => ModuleKind::Annotation,
        }
    }
}

/// Role of a module in the container tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Primary,
    Variant,
    Annotation,
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleKind::Primary => write!(f, "primary"),
            ModuleKind::Variant => write!(f, "variant"),
            ModuleKind::Annotation => write!(f, "annotation"),
        }
    }
}

/// Variants and annotations attached to a module, in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRelations {
    /// Variant modules derived from this module
    pub variants: Vec<ModuleId>,

    /// Annotation modules commenting on this module
    pub annotations: Vec<ModuleId>,
}

impl ModuleRelations {
    /// Returns true if `id` is a variant or annotation of this module
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.variants.contains(id) || self.annotations.contains(id)
    }
}

/// Lightweight description of a module, without its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub id: ModuleId,
    pub schema_id: String,
    pub schema_path: String,
    pub kind: ModuleKind,
    pub parent: Option<ModuleId>,
    pub encounter_id: EncounterId,
    pub version: u64,
}
