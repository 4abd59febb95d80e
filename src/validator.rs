//! Validator engine — metadata-derived change-detection tokens.
//!
//! A token is computed from `(id, version, last_updated_ms)` only; payload
//! bytes never enter the digest, so computing a token costs the same for an
//! empty record and a multi-megabyte one.
//!
//! The canonical input is the string `{id}-{version}-{last_updated_ms}` —
//! fixed field order, `-` separator, both integers in base 10 — hashed with
//! MD5 and rendered as 32 lowercase hex characters. The canonical form is part
//! of the contract: an independent implementation hashing the same canonical
//! string must produce an identical token. MD5 here is a change-detection
//! fingerprint, not a security boundary.

use md5::{Digest, Md5};

use crate::record::RecordMeta;

/// Compute the validator token for a record's metadata.
///
/// Pure and deterministic: identical inputs always produce identical tokens.
/// Token comparison is exact byte-for-byte string equality — no normalization,
/// no case folding.
pub fn compute_validator(id: &str, version: u64, last_updated_ms: u64) -> String {
    let canonical = format!("{id}-{version}-{last_updated_ms}");
    let mut hasher = Md5::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Token for an already-fetched metadata snapshot.
pub fn validator_for(id: &str, meta: RecordMeta) -> String {
    compute_validator(id, meta.version, meta.last_updated_ms)
}
