//! Shared helpers for the integration tests

#![allow(dead_code)]

use serde_json::json;
use std::sync::Arc;
use umdf::core::access::KdfParams;
use umdf::core::container::{Reader, Writer, WriterOptions};
use umdf::core::schema::SchemaRegistry;
use umdf::domain::{FileAccessMode, ModuleData};

/// Argon2 parameters small enough for tests
pub fn cheap_kdf() -> KdfParams {
    KdfParams::new(256, 1, 1)
}

pub fn writer(mode: FileAccessMode) -> Writer {
    Writer::new(
        Arc::new(SchemaRegistry::builtin()),
        WriterOptions {
            access_mode: mode,
            kdf: cheap_kdf(),
            sync_on_commit: false,
        },
    )
}

pub fn reader() -> Reader {
    Reader::new(cheap_kdf())
}

pub fn patient(name: &str) -> ModuleData {
    ModuleData::builder("patient").field("name", json!(name)).build()
}
