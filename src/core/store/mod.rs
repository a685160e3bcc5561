//! Module store
//!
//! - [`module_store`] - encounters, module tree and audit history in memory
//! - [`locks`] - per-module-id mutation locks

pub mod locks;
pub mod module_store;

pub use locks::{ModuleGuard, ModuleLocks};
pub use module_store::{ModuleRecord, ModuleStore};
