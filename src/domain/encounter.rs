//! Encounter domain model

use super::ids::{EncounterId, ModuleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level grouping of clinical data for one care episode
///
/// Only top-level modules are members; variants and annotations reach the
/// encounter through their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    /// Engine-assigned identifier
    pub id: EncounterId,

    /// Timestamp when the encounter was created
    pub created_at: DateTime<Utc>,

    /// Member modules in insertion order
    pub modules: Vec<ModuleId>,
}

impl Encounter {
    /// Creates an empty encounter
    pub fn new(id: EncounterId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            modules: Vec::new(),
        }
    }

    /// Returns the number of member modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}
