//! Audit trail engine

pub mod trail;

pub use trail::AuditTrail;
