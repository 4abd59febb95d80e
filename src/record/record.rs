use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Milliseconds since the Unix epoch.
///
/// The canonical timestamp unit for record metadata. Integer millis keep the
/// validator's canonical string identical across platforms — no float
/// formatting anywhere in the token path.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Change-relevant metadata for a record.
///
/// This is the only input (besides the id) to validator computation.
/// `version` starts at 1 and increases by exactly one per committed update;
/// `last_updated_ms` never goes backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub version: u64,
    pub last_updated_ms: u64,
}

/// A stored record: stable id, change-detection metadata, and a payload that
/// may be arbitrarily large.
///
/// The payload never participates in change detection — any mutation of it
/// must go through the store, which bumps the metadata in the same step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    id: String,
    meta: RecordMeta,
    payload: Value,
}

impl Record {
    /// Create a record at version 1 with the current timestamp.
    pub fn new(id: impl Into<String>, payload: Value) -> Self {
        Record {
            id: id.into(),
            meta: RecordMeta {
                version: 1,
                last_updated_ms: now_millis(),
            },
            payload,
        }
    }

    /// Create a record with explicit metadata.
    pub fn with_meta(id: impl Into<String>, meta: RecordMeta, payload: Value) -> Self {
        Record {
            id: id.into(),
            meta,
            payload,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn meta(&self) -> RecordMeta {
        self.meta
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consume the record, keeping only the payload.
    pub fn into_payload(self) -> Value {
        self.payload
    }

    pub(crate) fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Value {
        &mut self.payload
    }
}

/// Replacement value for the updatable payload subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadPatch {
    pub preferences: Value,
}
