//! Domain models and types for the UMDF engine.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`EncounterId`], [`ModuleId`])
//! - **Domain models** ([`ModuleData`], [`Encounter`], [`ModuleTrail`], [`FileInfo`])
//! - **Error types** ([`UmdfError`], [`ErrorKind`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Encounter and module identifiers are distinct newtypes over UUIDs:
//!
//! ```rust
//! use umdf::domain::{EncounterId, ModuleId};
//!
//! let encounter = EncounterId::generate();
//! let module = ModuleId::generate();
//!
//! // This won't compile - the types cannot be mixed
//! // let wrong: ModuleId = encounter;
//! # let _ = (encounter, module);
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, UmdfError>`]:
//!
//! ```rust
//! use umdf::domain::{Result, UmdfError};
//!
//! fn example() -> Result<()> {
//!     Err(UmdfError::InvalidState("container is closed".to_string()))
//! }
//! ```

pub mod container;
pub mod encounter;
pub mod errors;
pub mod ids;
pub mod module;
pub mod result;
pub mod trail;

// Re-export commonly used types for convenience
pub use container::{EncounterSummary, FileAccessMode, FileInfo, OpenMode};
pub use encounter::Encounter;
pub use errors::{ErrorKind, UmdfError};
pub use ids::{EncounterId, ModuleId};
pub use module::{
    FieldMap, ModuleData, ModuleDataBuilder, ModuleKind, ModuleRelations, ModuleSummary,
    Placement,
};
pub use result::Result;
pub use trail::ModuleTrail;
