//! In-memory module store
//!
//! The store is the state machine the journal drives. Every mutation goes
//! through [`ModuleStore::check`] and then [`ModuleStore::apply`]; replaying a
//! container's journal through the same pair rebuilds the exact state the
//! writer had.

use crate::core::audit::AuditTrail;
use crate::core::container::format::JournalRecord;
use crate::core::verification::checksum::checksum_of;
use crate::domain::{
    Encounter, EncounterId, EncounterSummary, ModuleData, ModuleId, ModuleRelations,
    ModuleSummary, ModuleTrail, Placement, Result, UmdfError,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Current state of one module
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// Current payload; `data.id` is always set
    pub data: ModuleData,
    pub id: ModuleId,
    pub schema_path: String,
    pub placement: Placement,
    /// Encounter of the tree root
    pub encounter_id: EncounterId,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    /// Number of accepted updates
    pub version: u64,
    pub relations: ModuleRelations,
}

impl ModuleRecord {
    /// Returns the lightweight description of this module
    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            id: self.id,
            schema_id: self.data.schema_id.clone(),
            schema_path: self.schema_path.clone(),
            kind: self.placement.kind(),
            parent: self.placement.parent(),
            encounter_id: self.encounter_id,
            version: self.version,
        }
    }
}

/// Encounters, modules and their audit history
#[derive(Debug, Default)]
pub struct ModuleStore {
    encounters: HashMap<EncounterId, Encounter>,
    encounter_order: Vec<EncounterId>,
    modules: HashMap<ModuleId, ModuleRecord>,
    module_order: Vec<ModuleId>,
    audit: AuditTrail,
}

impl ModuleStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that `record` can be applied to the current state
    ///
    /// # Errors
    ///
    /// - [`UmdfError::NotFound`] for a missing encounter, parent or module
    /// - [`UmdfError::Conflict`] for a reused identifier
    /// - [`UmdfError::Integrity`] for an update that does not continue the
    ///   module's history
    pub fn check(&self, record: &JournalRecord) -> Result<()> {
        match record {
            JournalRecord::EncounterCreated { encounter_id, .. } => {
                if self.encounters.contains_key(encounter_id) {
                    return Err(UmdfError::Conflict(format!(
                        "Encounter {encounter_id} already exists"
                    )));
                }
                Ok(())
            }
            JournalRecord::ModuleAdded {
                module, placement, ..
            } => {
                let id = module.id.ok_or_else(|| {
                    UmdfError::Validation("Added module carries no id".to_string())
                })?;
                if self.modules.contains_key(&id) {
                    return Err(UmdfError::Conflict(format!("Module {id} already exists")));
                }
                self.encounter_for(placement).map(|_| ())
            }
            JournalRecord::ModuleUpdated { trail, .. } => {
                let current = self.module(&trail.module_id)?;
                if trail.version != current.version {
                    return Err(UmdfError::Integrity(format!(
                        "Update of module {} expects version {}, module is at {}",
                        trail.module_id, trail.version, current.version
                    )));
                }
                if checksum_of(&current.data)? != trail.checksum {
                    return Err(UmdfError::Integrity(format!(
                        "Audit checksum of module {} does not match its state",
                        trail.module_id
                    )));
                }
                Ok(())
            }
        }
    }

    /// Applies a record that passed [`check`](Self::check)
    ///
    /// Records that would not pass `check` are ignored.
    pub fn apply(&mut self, record: JournalRecord) {
        match record {
            JournalRecord::EncounterCreated {
                encounter_id,
                created_at,
            } => {
                self.encounters
                    .insert(encounter_id, Encounter::new(encounter_id, created_at));
                self.encounter_order.push(encounter_id);
            }
            JournalRecord::ModuleAdded {
                module,
                schema_path,
                placement,
                created_at,
                author,
            } => {
                let (Some(id), Ok(encounter_id)) = (module.id, self.encounter_for(&placement))
                else {
                    return;
                };
                match placement {
                    Placement::Encounter { encounter_id } => {
                        if let Some(encounter) = self.encounters.get_mut(&encounter_id) {
                            encounter.modules.push(id);
                        }
                    }
                    Placement::Variant { parent_id } => {
                        if let Some(parent) = self.modules.get_mut(&parent_id) {
                            parent.relations.variants.push(id);
                        }
                    }
                    Placement::Annotation { parent_id } => {
                        if let Some(parent) = self.modules.get_mut(&parent_id) {
                            parent.relations.annotations.push(id);
                        }
                    }
                }
                self.audit.register(id);
                self.module_order.push(id);
                self.modules.insert(
                    id,
                    ModuleRecord {
                        data: module,
                        id,
                        schema_path,
                        placement,
                        encounter_id,
                        created_at,
                        created_by: author,
                        updated_at: created_at,
                        version: 0,
                        relations: ModuleRelations::default(),
                    },
                );
            }
            JournalRecord::ModuleUpdated {
                trail,
                data,
                metadata,
            } => {
                let Some(current) = self.modules.get_mut(&trail.module_id) else {
                    return;
                };
                let snapshot = current.data.clone();
                current.data.data = data;
                current.data.metadata = metadata;
                current.version = trail.superseded_by();
                current.updated_at = trail.recorded_at;
                self.audit.record(trail, snapshot);
            }
        }
    }

    /// Checks and applies a record
    pub fn commit(&mut self, record: JournalRecord) -> Result<()> {
        self.check(&record)?;
        self.apply(record);
        Ok(())
    }

    /// Resolves the encounter a placement attaches to
    pub fn encounter_for(&self, placement: &Placement) -> Result<EncounterId> {
        match placement {
            Placement::Encounter { encounter_id } => self.encounter(encounter_id).map(|e| e.id),
            Placement::Variant { parent_id } | Placement::Annotation { parent_id } => self
                .modules
                .get(parent_id)
                .map(|parent| parent.encounter_id)
                .ok_or_else(|| UmdfError::NotFound(format!("Parent module {parent_id}"))),
        }
    }

    /// Returns an encounter
    pub fn encounter(&self, id: &EncounterId) -> Result<&Encounter> {
        self.encounters
            .get(id)
            .ok_or_else(|| UmdfError::NotFound(format!("Encounter {id}")))
    }

    /// Returns a module record
    pub fn module(&self, id: &ModuleId) -> Result<&ModuleRecord> {
        self.modules
            .get(id)
            .ok_or_else(|| UmdfError::NotFound(format!("Module {id}")))
    }

    /// Returns the current state of a module
    pub fn module_data(&self, id: &ModuleId) -> Result<ModuleData> {
        self.module(id).map(|record| record.data.clone())
    }

    /// Returns the variants and annotations of a module
    pub fn relations(&self, id: &ModuleId) -> Result<ModuleRelations> {
        self.module(id).map(|record| record.relations.clone())
    }

    /// Returns every module id in creation order
    pub fn module_ids(&self) -> Vec<ModuleId> {
        self.module_order.clone()
    }

    /// Returns a module's audit entries, oldest first
    pub fn audit_trail(&self, id: &ModuleId) -> Result<Vec<ModuleTrail>> {
        self.audit.trail_for(id)
    }

    /// Returns the state preserved by an audit entry
    pub fn audit_data(&self, trail: &ModuleTrail) -> Result<ModuleData> {
        self.audit.data_for(trail)
    }

    pub fn encounter_count(&self) -> usize {
        self.encounter_order.len()
    }

    pub fn module_count(&self) -> usize {
        self.module_order.len()
    }

    /// Encounters in creation order
    pub fn encounter_summaries(&self) -> Vec<EncounterSummary> {
        self.encounter_order
            .iter()
            .filter_map(|id| self.encounters.get(id))
            .map(|e| EncounterSummary {
                id: e.id,
                created_at: e.created_at,
                modules: e.modules.clone(),
            })
            .collect()
    }

    /// Modules in creation order
    pub fn module_summaries(&self) -> Vec<ModuleSummary> {
        self.module_order
            .iter()
            .filter_map(|id| self.modules.get(id))
            .map(ModuleRecord::summary)
            .collect()
    }
}
