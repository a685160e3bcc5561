//! Identifier and access-control layer
//!
//! - [`password`] - Argon2id hashing and constant-time verification
//! - [`policy`] - `FailIfExists` / `AllowUpdate` / `Overwrite` resolution

pub mod password;
pub mod policy;

pub use password::{check_access, hash_password, verify_password, KdfParams};
pub use policy::{resolve_create, CreateIntent};
