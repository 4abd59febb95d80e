//! service — convention-based command handler layer.
//!
//! Build the record service by registering command handlers on a `Service`.
//! Each handler receives a `Context<S>` with access to the input payload,
//! session fields, and the record store, and returns a [`Reply`] that the
//! transport adapter renders — the core never names status codes or headers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use etagged::{handlers, service, MemoryStore, Record};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.insert(Record::new("user123", json!({ "preferences": {} })))?;
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
//!
//! ## Handler Convention
//!
//! Each handler module follows this convention:
//!
//! ```ignore
//! // src/handlers/profile_read.rs
//!
//! pub const COMMAND: &str = "profile.read";
//!
//! pub fn guard<S>(ctx: &Context<S>) -> bool {
//!     ctx.has_field("id")
//! }
//!
//! pub fn handle<S: RecordStore>(ctx: &Context<S>) -> Result<Reply, HandlerError> {
//!     let meta = ctx.store().meta("user123")?;
//!     // ...
//! }
//! ```

mod context;
mod error;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use service::{CommandRequest, CommandResponse, Reply, Service};
pub use session::Session;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export:
/// - `COMMAND: &str` — the command name
/// - `guard(ctx) -> bool` — input validation
/// - `handle(ctx) -> Result<Reply, HandlerError>` — the handler
///
/// # Example
/// ```ignore
/// let service = etagged::register_handlers!(
///     service::Service::new(store),
///     handlers::profile_read,
///     handlers::profile_update,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
