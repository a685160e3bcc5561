//! Container-level types: access policy, open mode and file information

use super::ids::{EncounterId, ModuleId};
use super::module::ModuleSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy applied when a writer creates a container at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileAccessMode {
    /// Refuse to touch an existing container
    #[default]
    FailIfExists,
    /// Open an existing container for incremental mutation
    AllowUpdate,
    /// Replace whatever is at the path
    Overwrite,
}

impl FileAccessMode {
    /// Returns the configuration spelling of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            FileAccessMode::FailIfExists => "fail_if_exists",
            FileAccessMode::AllowUpdate => "allow_update",
            FileAccessMode::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for FileAccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileAccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fail_if_exists" => Ok(FileAccessMode::FailIfExists),
            "allow_update" => Ok(FileAccessMode::AllowUpdate),
            "overwrite" => Ok(FileAccessMode::Overwrite),
            other => Err(format!(
                "Invalid access mode '{other}'. Must be one of: fail_if_exists, allow_update, overwrite"
            )),
        }
    }
}

/// Intent a container handle was opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    Read,
    Write,
}

/// Encounter entry of the module graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub id: EncounterId,
    pub created_at: DateTime<Utc>,
    pub modules: Vec<ModuleId>,
}

/// Container-level metadata returned by `get_file_info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path the container was opened from
    pub path: String,

    /// Author recorded when the container was created
    pub author: String,

    /// Creation timestamp of the container
    pub created_at: DateTime<Utc>,

    /// On-disk format version
    pub format_version: u32,

    /// Intent of the handle that produced this info
    pub open_mode: OpenMode,

    /// Active access policy (writers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_mode: Option<FileAccessMode>,

    /// Whether the container requires a password
    pub password_protected: bool,

    /// Number of encounters
    pub encounter_count: usize,

    /// Number of modules, including variants and annotations
    pub module_count: usize,

    /// Encounters in creation order
    pub encounters: Vec<EncounterSummary>,

    /// Modules in creation order
    pub modules: Vec<ModuleSummary>,
}
