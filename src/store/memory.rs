use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::record::{now_millis, PayloadPatch, Record, RecordMeta};
use crate::store::RecordStore;

/// In-memory record store backed by `Arc<RwLock<HashMap>>`.
///
/// Clones share the same underlying storage, so one handle can be handed to a
/// service while the embedding code keeps another for seeding or inspection.
/// All updates serialize on the write lock; metadata reads take the read lock
/// just long enough to copy two integers.
#[derive(Clone)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a record.
    ///
    /// Seeding is out of band: record creation is not one of the modeled
    /// request operations.
    pub fn insert(&self, record: Record) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?;
        records.insert(record.id().to_string(), record);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Record, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn meta(&self, id: &str) -> Result<RecordMeta, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        records
            .get(id)
            .map(|record| record.meta())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn apply_update(&self, id: &str, patch: PayloadPatch) -> Result<u64, StoreError> {
        if !patch.preferences.is_object() {
            return Err(StoreError::InvalidPatch(
                "preferences must be a JSON object".to_string(),
            ));
        }

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        // Payload swap and metadata bump happen under the same write lock so a
        // reader never observes one without the other.
        if !record.payload().is_object() {
            *record.payload_mut() = Value::Object(Map::new());
        }
        if let Some(payload) = record.payload_mut().as_object_mut() {
            payload.insert("preferences".to_string(), patch.preferences);
        }

        let meta = record.meta_mut();
        meta.version += 1;
        meta.last_updated_ms = now_millis().max(meta.last_updated_ms);
        let new_version = meta.version;

        tracing::debug!(id = %id, version = new_version, "record updated");
        Ok(new_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert(Record::new(
                "user123",
                json!({
                    "name": "Alex",
                    "preferences": { "theme": "dark", "notifications": true },
                }),
            ))
            .unwrap();
        store
    }

    #[test]
    fn get_returns_the_seeded_record() {
        let store = seeded();
        let record = store.get("user123").unwrap();
        assert_eq!(record.id(), "user123");
        assert_eq!(record.meta().version, 1);
        assert_eq!(record.payload()["preferences"]["theme"], "dark");
    }

    #[test]
    fn meta_matches_the_full_snapshot() {
        let store = seeded();
        let meta = store.meta("user123").unwrap();
        let record = store.get("user123").unwrap();
        assert_eq!(meta, record.meta());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = seeded();
        assert_eq!(
            store.get("ghost").unwrap_err(),
            StoreError::NotFound("ghost".to_string())
        );
        assert_eq!(
            store.meta("ghost").unwrap_err(),
            StoreError::NotFound("ghost".to_string())
        );
        let patch = PayloadPatch {
            preferences: json!({}),
        };
        assert_eq!(
            store.apply_update("ghost", patch).unwrap_err(),
            StoreError::NotFound("ghost".to_string())
        );
    }

    #[test]
    fn apply_update_replaces_preferences_and_bumps_version() {
        let store = seeded();
        let new_version = store
            .apply_update(
                "user123",
                PayloadPatch {
                    preferences: json!({ "theme": "light" }),
                },
            )
            .unwrap();
        assert_eq!(new_version, 2);

        let record = store.get("user123").unwrap();
        assert_eq!(record.meta().version, 2);
        assert_eq!(record.payload()["preferences"], json!({ "theme": "light" }));
        // Untouched payload fields survive the patch.
        assert_eq!(record.payload()["name"], "Alex");
    }

    #[test]
    fn updates_are_monotonic() {
        let store = seeded();
        for expected in 2..=6 {
            let version = store
                .apply_update(
                    "user123",
                    PayloadPatch {
                        preferences: json!({ "step": expected }),
                    },
                )
                .unwrap();
            assert_eq!(version, expected);
        }
        assert_eq!(store.meta("user123").unwrap().version, 6);
    }

    #[test]
    fn timestamp_never_goes_backwards() {
        let store = seeded();
        let before = store.meta("user123").unwrap().last_updated_ms;
        store
            .apply_update(
                "user123",
                PayloadPatch {
                    preferences: json!({}),
                },
            )
            .unwrap();
        let after = store.meta("user123").unwrap().last_updated_ms;
        assert!(after >= before);
    }

    #[test]
    fn malformed_patch_leaves_the_record_untouched() {
        let store = seeded();
        let before = store.get("user123").unwrap();

        let err = store
            .apply_update(
                "user123",
                PayloadPatch {
                    preferences: json!("light"),
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPatch(_)));

        let after = store.get("user123").unwrap();
        assert_eq!(after.meta(), before.meta());
        assert_eq!(after.payload(), before.payload());
    }

    #[test]
    fn clones_share_storage() {
        let store = seeded();
        let handle = store.clone();
        handle
            .apply_update(
                "user123",
                PayloadPatch {
                    preferences: json!({ "theme": "light" }),
                },
            )
            .unwrap();
        assert_eq!(store.meta("user123").unwrap().version, 2);
    }
}
