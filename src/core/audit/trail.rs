//! Append-only audit history
//!
//! Each update to a module pushes one [`ModuleTrail`] entry together with an
//! immutable snapshot of the state the update replaced. Snapshots are pinned by
//! the entry checksum and re-verified whenever they are read back.

use crate::core::verification::checksum::verify_checksum;
use crate::domain::{ModuleData, ModuleId, ModuleTrail, Result, UmdfError};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct AuditEntry {
    trail: ModuleTrail,
    snapshot: ModuleData,
}

/// History of every module in a container
#[derive(Debug, Default)]
pub struct AuditTrail {
    entries: HashMap<ModuleId, Vec<AuditEntry>>,
}

impl AuditTrail {
    /// Creates an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an empty history for a newly created module
    pub fn register(&mut self, module_id: ModuleId) {
        self.entries.entry(module_id).or_default();
    }

    /// Appends an entry and its preserved snapshot
    ///
    /// The caller has already checked that `trail.version` continues the
    /// module's history and that `trail.checksum` matches `snapshot`.
    pub fn record(&mut self, trail: ModuleTrail, snapshot: ModuleData) {
        self.entries
            .entry(trail.module_id)
            .or_default()
            .push(AuditEntry { trail, snapshot });
    }

    /// Returns a module's entries, oldest first
    ///
    /// # Errors
    ///
    /// Returns [`UmdfError::NotFound`] if the module is unknown.
    pub fn trail_for(&self, module_id: &ModuleId) -> Result<Vec<ModuleTrail>> {
        self.entries
            .get(module_id)
            .map(|entries| entries.iter().map(|e| e.trail.clone()).collect())
            .ok_or_else(|| UmdfError::NotFound(format!("Module {module_id}")))
    }

    /// Returns the snapshot preserved by `trail`
    ///
    /// # Errors
    ///
    /// - [`UmdfError::NotFound`] if the entry does not belong to this history
    /// - [`UmdfError::Integrity`] if the stored snapshot no longer matches the
    ///   entry checksum
    pub fn data_for(&self, trail: &ModuleTrail) -> Result<ModuleData> {
        let entry = self
            .entries
            .get(&trail.module_id)
            .and_then(|entries| usize::try_from(trail.version).ok().and_then(|v| entries.get(v)))
            .filter(|entry| entry.trail == *trail)
            .ok_or_else(|| {
                UmdfError::NotFound(format!(
                    "Audit entry v{} of module {}",
                    trail.version, trail.module_id
                ))
            })?;

        if !verify_checksum(&entry.snapshot, &entry.trail.checksum)? {
            return Err(UmdfError::Integrity(format!(
                "Audit snapshot v{} of module {} does not match its checksum",
                trail.version, trail.module_id
            )));
        }
        Ok(entry.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::verification::checksum::checksum_of;
    use chrono::Utc;
    use serde_json::json;

    fn snapshot(id: ModuleId, name: &str) -> ModuleData {
        let mut module = ModuleData::builder("patient").field("name", json!(name)).build();
        module.id = Some(id);
        module
    }

    fn entry_for(snapshot: &ModuleData, version: u64) -> ModuleTrail {
        ModuleTrail {
            module_id: snapshot.id.unwrap(),
            version,
            recorded_at: Utc::now(),
            author: "tester".to_string(),
            checksum: checksum_of(snapshot).unwrap(),
        }
    }

    #[test]
    fn test_unknown_module_is_not_found() {
        let audit = AuditTrail::new();
        let result = audit.trail_for(&ModuleId::generate());
        assert!(matches!(result, Err(UmdfError::NotFound(_))));
    }

    #[test]
    fn test_registered_module_has_empty_trail() {
        let mut audit = AuditTrail::new();
        let id = ModuleId::generate();
        audit.register(id);
        assert!(audit.trail_for(&id).unwrap().is_empty());
    }

    #[test]
    fn test_record_and_read_back() {
        let mut audit = AuditTrail::new();
        let id = ModuleId::generate();
        audit.register(id);

        let v0 = snapshot(id, "Jane");
        let v1 = snapshot(id, "Jane Doe");
        let t0 = entry_for(&v0, 0);
        let t1 = entry_for(&v1, 1);
        audit.record(t0.clone(), v0.clone());
        audit.record(t1.clone(), v1.clone());

        let trail = audit.trail_for(&id).unwrap();
        assert_eq!(trail, vec![t0.clone(), t1]);
        assert_eq!(audit.data_for(&t0).unwrap(), v0);
        assert_eq!(audit.data_for(&t0).unwrap(), audit.data_for(&t0).unwrap());
    }

    #[test]
    fn test_foreign_entry_is_not_found() {
        let mut audit = AuditTrail::new();
        let id = ModuleId::generate();
        audit.register(id);
        let v0 = snapshot(id, "Jane");
        let t0 = entry_for(&v0, 0);
        audit.record(t0.clone(), v0);

        let mut forged = t0;
        forged.checksum = "0".repeat(64);
        assert!(matches!(audit.data_for(&forged), Err(UmdfError::NotFound(_))));
    }

    #[test]
    fn test_tampered_snapshot_is_integrity_error() {
        let mut audit = AuditTrail::new();
        let id = ModuleId::generate();
        audit.register(id);
        let v0 = snapshot(id, "Jane");
        let t0 = entry_for(&v0, 0);
        audit.record(t0.clone(), snapshot(id, "Mallory"));

        assert!(matches!(audit.data_for(&t0), Err(UmdfError::Integrity(_))));
    }
}
