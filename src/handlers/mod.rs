//! Shipped command handlers for the profile record.
//!
//! Each handler module follows the service convention: a `COMMAND` name, a
//! `guard` checking required input fields, and a `handle` doing the work.

pub mod profile_read;
pub mod profile_update;

use crate::service::Service;
use crate::store::RecordStore;

/// Build a service with the profile handlers registered.
pub fn profile_service<S: RecordStore + Send + Sync + 'static>(store: S) -> Service<S> {
    crate::register_handlers!(Service::new(store), profile_read, profile_update)
}
