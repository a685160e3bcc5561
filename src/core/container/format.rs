//! On-disk container layout
//!
//! A container is a UTF-8 file of JSON lines. The first line is the
//! [`ContainerHeader`]; every following line is a [`JournalLine`] wrapping one
//! [`JournalRecord`]. Lines are only ever appended.

use crate::core::verification::checksum::{checksum_of, verify_checksum};
use crate::domain::{
    EncounterId, FieldMap, ModuleData, ModuleId, ModuleTrail, Placement, Result, UmdfError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Magic value identifying a UMDF container header
pub const MAGIC: &str = "UMDF";

/// Newest layout version this build reads and writes
pub const FORMAT_VERSION: u32 = 1;

/// First line of every container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerHeader {
    pub magic: String,
    pub format_version: u32,
    /// Author that created the container
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// Argon2id PHC string; absent for unauthenticated containers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

impl ContainerHeader {
    /// Creates a header for a new container
    pub fn new(author: impl Into<String>, access: Option<String>) -> Self {
        Self {
            magic: MAGIC.to_string(),
            format_version: FORMAT_VERSION,
            author: author.into(),
            created_at: Utc::now(),
            access,
        }
    }

    /// Parses and checks a header line
    ///
    /// # Errors
    ///
    /// Returns [`UmdfError::Integrity`] for malformed lines, a wrong magic value
    /// or an unsupported format version.
    pub fn parse(line: &str) -> Result<Self> {
        let header: ContainerHeader = serde_json::from_str(line)
            .map_err(|e| UmdfError::Integrity(format!("Unreadable container header: {e}")))?;
        if header.magic != MAGIC {
            return Err(UmdfError::Integrity(format!(
                "Not a UMDF container (magic '{}')",
                header.magic
            )));
        }
        if header.format_version == 0 || header.format_version > FORMAT_VERSION {
            return Err(UmdfError::Integrity(format!(
                "Unsupported format version {}",
                header.format_version
            )));
        }
        Ok(header)
    }

    /// Returns true if opening requires a password
    pub fn is_password_protected(&self) -> bool {
        self.access.is_some()
    }
}

/// One committed mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalRecord {
    /// A new, empty encounter
    EncounterCreated {
        encounter_id: EncounterId,
        created_at: DateTime<Utc>,
    },

    /// A new module; `module.id` is always set
    ModuleAdded {
        module: ModuleData,
        schema_path: String,
        placement: Placement,
        created_at: DateTime<Utc>,
        author: String,
    },

    /// Replacement of a module's data and metadata
    ///
    /// `trail` is the audit entry preserving the replaced state.
    ModuleUpdated {
        trail: ModuleTrail,
        data: FieldMap,
        metadata: FieldMap,
    },
}

impl JournalRecord {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            JournalRecord::EncounterCreated { .. } => "encounter_created",
            JournalRecord::ModuleAdded { .. } => "module_added",
            JournalRecord::ModuleUpdated { .. } => "module_updated",
        }
    }

    /// Module the record creates or changes, if any
    pub fn module_id(&self) -> Option<ModuleId> {
        match self {
            JournalRecord::EncounterCreated { .. } => None,
            JournalRecord::ModuleAdded { module, .. } => module.id,
            JournalRecord::ModuleUpdated { trail, .. } => Some(trail.module_id),
        }
    }
}

/// A journal entry as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Position in the journal, starting at 1
    pub seq: u64,
    /// SHA-256 of the canonical record
    pub checksum: String,
    pub record: JournalRecord,
}

impl JournalLine {
    /// Wraps a record, computing its checksum
    pub fn seal(seq: u64, record: JournalRecord) -> Result<Self> {
        let checksum = checksum_of(&record)?;
        Ok(Self {
            seq,
            checksum,
            record,
        })
    }

    /// Parses a line and checks its sequence number and checksum
    pub fn open(line: &str, expected_seq: u64) -> Result<Self> {
        let entry: JournalLine = serde_json::from_str(line).map_err(|e| {
            UmdfError::Integrity(format!("Unreadable journal entry {expected_seq}: {e}"))
        })?;
        if entry.seq != expected_seq {
            return Err(UmdfError::Integrity(format!(
                "Journal sequence broken: expected {expected_seq}, found {}",
                entry.seq
            )));
        }
        if !verify_checksum(&entry.record, &entry.checksum)? {
            return Err(UmdfError::Integrity(format!(
                "Checksum mismatch in journal entry {expected_seq}"
            )));
        }
        Ok(entry)
    }

    /// Serializes the entry as one line, including the trailing newline
    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
