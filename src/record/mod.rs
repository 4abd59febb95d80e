mod record;

pub use record::{now_millis, PayloadPatch, Record, RecordMeta};
