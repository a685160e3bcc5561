//! Audit trail entry model

use super::ids::ModuleId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable entry in a module's audit history
///
/// The entry preserves the module as it stood at `version`, i.e. the state an
/// update replaced. Version 0 is the state the module was created with.
/// `checksum` is the SHA-256 of the canonical JSON of that state and pins the
/// snapshot returned by `get_audit_data`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleTrail {
    /// Module the entry belongs to
    pub module_id: ModuleId,

    /// Version of the preserved state
    pub version: u64,

    /// When the replacing update was recorded
    pub recorded_at: DateTime<Utc>,

    /// Author of the replacing update
    pub author: String,

    /// Hex SHA-256 of the preserved state
    pub checksum: String,
}

impl ModuleTrail {
    /// Version the module moved to with the update that produced this entry
    pub fn superseded_by(&self) -> u64 {
        self.version + 1
    }
}
