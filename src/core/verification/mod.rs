//! Integrity verification for container contents

pub mod checksum;

pub use checksum::{calculate_checksum, checksum_of, verify_checksum};
