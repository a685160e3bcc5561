//! Domain identifier types with validation
//!
//! Encounter and module identifiers are UUIDs assigned by the engine. Each gets
//! its own newtype so the two can never be mixed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Encounter identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use umdf::domain::ids::EncounterId;
/// use std::str::FromStr;
///
/// let id = EncounterId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(id.to_string(), "7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncounterId(Uuid);

impl EncounterId {
    /// Generates a fresh random encounter id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an encounter id from its hyphenated string form
    ///
    /// # Returns
    ///
    /// Returns `Ok(EncounterId)` if the string is a valid UUID, `Err` otherwise
    pub fn new(id: impl AsRef<str>) -> Result<Self, String> {
        let id = id.as_ref();
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|e| format!("Invalid encounter ID '{id}': {e}"))
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EncounterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Module identifier newtype wrapper
///
/// Identifies every module in a container, including variants and annotations.
///
/// # Examples
///
/// ```
/// use umdf::domain::ids::ModuleId;
///
/// let id = ModuleId::generate();
/// let parsed: ModuleId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(Uuid);

impl ModuleId {
    /// Generates a fresh random module id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a module id from its hyphenated string form
    pub fn new(id: impl AsRef<str>) -> Result<Self, String> {
        let id = id.as_ref();
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|e| format!("Invalid module ID '{id}': {e}"))
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
