//! etagged — conditional-read record service.
//!
//! A mutable record is exposed through a read operation that supports
//! conditional retrieval: clients present a cached validator token and receive
//! either "not modified" or the full payload plus a fresh token. Tokens are
//! derived from record metadata only, so change detection never scales with
//! payload size.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use etagged::{handlers, service, MemoryStore, Record};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.insert(Record::new("user123", json!({
//!     "name": "Alex",
//!     "preferences": { "theme": "dark", "notifications": true },
//! })))?;
//!
//! let service = Arc::new(handlers::profile_service(store));
//!
//! // Direct dispatch
//! let reply = service.dispatch(
//!     "profile.read",
//!     json!({ "id": "user123" }),
//!     service::Session::new(),
//! )?;
//!
//! // HTTP transport (requires the "http" feature)
//! // service::serve(service, "0.0.0.0:3000").await?;
//! ```

mod error;
mod record;
mod store;
mod validator;

pub mod handlers;
pub mod service;

pub use error::StoreError;
pub use record::{now_millis, PayloadPatch, Record, RecordMeta};
pub use store::{MemoryStore, RecordStore};
pub use validator::{compute_validator, validator_for};
