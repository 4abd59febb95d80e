//! Record store — the sole owner of mutable record state.
//!
//! Handlers talk to the store through the [`RecordStore`] trait and borrow it
//! only for the duration of one request. The metadata read path is deliberately
//! separate from the snapshot path so a conditional read that ends in
//! "not modified" never touches the payload.

mod memory;

pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::record::{PayloadPatch, Record, RecordMeta};

pub trait RecordStore {
    /// Current full snapshot of a record (metadata + payload).
    ///
    /// Reflects the most recently committed update — no stale reads.
    fn get(&self, id: &str) -> Result<Record, StoreError>;

    /// Current metadata only. Must not clone or serialize the payload.
    fn meta(&self, id: &str) -> Result<RecordMeta, StoreError>;

    /// Replace the record's `preferences` subset and bump its metadata as one
    /// atomic unit. Returns the new version.
    ///
    /// Fails with [`StoreError::InvalidPatch`] when `patch.preferences` is not
    /// a JSON object; in that case nothing is mutated.
    fn apply_update(&self, id: &str, patch: PayloadPatch) -> Result<u64, StoreError>;
}
