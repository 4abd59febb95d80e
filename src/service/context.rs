//! Context passed to command handlers.
//!
//! Carries the parsed input, session fields, and a reference to the record
//! store. Handlers access everything they need through the context, and hold
//! it only for the duration of one dispatch — nothing read through it may be
//! cached across requests.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;

/// The context passed to every command handler.
///
/// Generic over `S` (the store type) so handlers can work with whatever store
/// implementation the service is configured with.
///
/// ## Example
///
/// ```ignore
/// pub fn handle<S: RecordStore>(ctx: &Context<S>) -> Result<Reply, HandlerError> {
///     let input = ctx.input::<ReadProfile>()?;
///     let meta = ctx.store().meta(&input.id)?;
///     // ...
/// }
/// ```
pub struct Context<'a, S> {
    /// The command name being handled.
    command_name: String,
    /// Raw JSON input from the request.
    input: Value,
    /// Session fields (client validator token, etc.).
    session: Session,
    /// Reference to the record store.
    store: &'a S,
}

impl<'a, S> Context<'a, S> {
    /// Create a new context.
    pub(crate) fn new(command_name: String, input: Value, session: Session, store: &'a S) -> Self {
        Self {
            command_name,
            input,
            session,
            store,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    /// Get the raw JSON input.
    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    /// Get the command name.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Get the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The client's cached validator token, if one was presented.
    pub fn if_none_match(&self) -> Option<&str> {
        self.session.if_none_match()
    }

    /// Get a reference to the record store.
    pub fn store(&self) -> &S {
        self.store
    }

    /// Check if the raw input contains a field.
    pub fn has_field(&self, field: &str) -> bool {
        self.input.get(field).is_some()
    }

    /// Check if the raw input contains all specified fields.
    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }
}
