//! Checksum calculation for container integrity
//!
//! Journal entries and audit snapshots are pinned by a SHA-256 of their
//! canonical JSON form, so a snapshot read back later can be proven identical
//! to the one that was recorded.

use crate::domain::Result;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of JSON data
///
/// Object keys serialize in sorted order because `serde_json::Map` is a
/// `BTreeMap`. The checksum depends on serde_json's `preserve_order` feature
/// staying off.
///
/// # Examples
///
/// ```
/// use umdf::core::verification::checksum::calculate_checksum;
/// use serde_json::json;
///
/// let data = json!({"key": "value"});
/// let checksum = calculate_checksum(&data).unwrap();
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum(data: &Value) -> Result<String> {
    let data_str = serde_json::to_string(data)?;
    Ok(calculate_checksum_bytes(data_str.as_bytes()))
}

/// Calculate the checksum of any serializable value through its JSON form
pub fn checksum_of<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_value(value)?;
    calculate_checksum(&json)
}

/// Returns true if `value` hashes to `expected`
pub fn verify_checksum<T: Serialize>(value: &T, expected: &str) -> Result<bool> {
    Ok(checksum_of(value)? == expected)
}

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}
