//! Service — command handler registry and dispatch.
//!
//! `Service<S>` holds a record store and a set of named command handlers.
//! Each handler receives a `Context<S>` and returns `Result<Reply, HandlerError>`.
//!
//! ## Example
//!
//! ```ignore
//! use etagged::service::{Reply, Service, Session};
//! use serde_json::json;
//!
//! let service = Service::new(store)
//!     .command("profile.read", |ctx| {
//!         let meta = ctx.store().meta("user123")?;
//!         Ok(Reply::Json(json!({ "version": meta.version })))
//!     });
//!
//! let reply = service.dispatch("profile.read", json!({}), Session::new());
//! ```

use std::collections::HashMap;

use serde_json::Value;

use super::context::Context;
use super::error::HandlerError;
use super::session::Session;

/// A registered command handler with optional guard.
struct CommandHandler<S> {
    guard: Option<Box<dyn Fn(&Context<S>) -> bool + Send + Sync>>,
    handle: Box<dyn Fn(&Context<S>) -> Result<Reply, HandlerError> + Send + Sync>,
}

/// A service that routes commands to handler functions.
///
/// Generic over `S`, the record store type. Handlers receive a `Context<S>`
/// and can access the store via `ctx.store()`.
pub struct Service<S> {
    store: S,
    handlers: HashMap<String, CommandHandler<S>>,
}

impl<S: Send + Sync + 'static> Service<S> {
    /// Create a new service with the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            handlers: HashMap::new(),
        }
    }

    /// Register a command handler.
    ///
    /// Uses builder pattern — returns `self` for chaining.
    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: None,
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Register a command handler with a guard function.
    ///
    /// The guard is called before the handler. If it returns `false`, the
    /// command is rejected with [`HandlerError::InvalidPatch`] and the handler
    /// never runs.
    pub fn command_guarded<G, F>(mut self, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<S>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<S>) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: Some(Box::new(guard)),
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Dispatch a command by name.
    ///
    /// Builds a `Context` from the input and session, looks up the handler,
    /// runs the guard (if any), then calls the handler.
    pub fn dispatch(
        &self,
        command: &str,
        input: Value,
        session: Session,
    ) -> Result<Reply, HandlerError> {
        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| HandlerError::UnknownCommand(command.to_string()))?;

        let ctx = Context::new(command.to_string(), input, session, &self.store);

        // Run guard if present
        if let Some(guard) = &handler.guard {
            if !guard(&ctx) {
                return Err(HandlerError::InvalidPatch(format!(
                    "required fields missing for command: {}",
                    command
                )));
            }
        }

        (handler.handle)(&ctx)
    }

    /// Dispatch a `CommandRequest`, returning a `CommandResponse`.
    pub fn dispatch_request(&self, request: &CommandRequest) -> CommandResponse {
        let session = Session::from_map(request.session_variables.clone());
        match self.dispatch(&request.command, request.input.clone(), session) {
            Ok(Reply::Json(value)) => CommandResponse {
                status: 200,
                validator: None,
                body: Some(value),
            },
            Ok(Reply::NotModified) => CommandResponse {
                status: 304,
                validator: None,
                body: None,
            },
            Ok(Reply::FullContent { payload, token }) => CommandResponse {
                status: 200,
                validator: Some(token),
                body: Some(payload),
            },
            Err(e) => CommandResponse {
                status: e.status_code(),
                validator: None,
                body: Some(serde_json::json!({ "error": e.to_string() })),
            },
        }
    }

    /// List registered command names.
    pub fn commands(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }

    /// Get a reference to the record store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

// =============================================================================
// Reply and request / response types
// =============================================================================

/// Outcome of a command, independent of any transport.
///
/// The transport adapter decides how each variant is rendered — status codes
/// and headers for HTTP, plain fields elsewhere. The core never names a
/// transport mechanism.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A plain JSON body.
    Json(Value),
    /// The client's cached copy is current; carries no payload.
    NotModified,
    /// Full payload plus the validator token the client should cache.
    FullContent { payload: Value, token: String },
}

/// An inbound command request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommandRequest {
    /// Command name (from the URL path or the envelope).
    pub command: String,
    /// JSON input payload.
    pub input: Value,
    /// Session fields (client validator token, etc.).
    #[serde(default)]
    pub session_variables: HashMap<String, String>,
}

/// Response from dispatching a command.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommandResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Validator token for the response's `ETag`-equivalent field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    /// Response body (handler result or error); absent on "not modified".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_service() -> Service<()> {
        Service::new(())
    }

    #[test]
    fn dispatch_returns_handler_result() {
        let service =
            test_service().command("ping", |_ctx| Ok(Reply::Json(json!({ "pong": true }))));
        let reply = service.dispatch("ping", json!({}), Session::new()).unwrap();
        assert_eq!(reply, Reply::Json(json!({ "pong": true })));
    }

    #[test]
    fn unknown_command() {
        let service = test_service().command("ping", |_ctx| Ok(Reply::NotModified));
        let result = service.dispatch("unknown", json!({}), Session::new());
        assert!(matches!(result, Err(HandlerError::UnknownCommand(ref s)) if s == "unknown"));
    }

    #[test]
    fn handler_error_propagates() {
        let service =
            test_service().command("fail", |_ctx| Err(HandlerError::NotFound("ghost".into())));
        let result = service.dispatch("fail", json!({}), Session::new());
        assert!(matches!(result, Err(HandlerError::NotFound(ref s)) if s == "ghost"));
    }

    #[test]
    fn decode_error_from_bad_payload() {
        #[derive(serde::Deserialize)]
        struct Input {
            _name: String,
        }

        let service = test_service().command("typed", |ctx| {
            let _input = ctx.input::<Input>()?;
            Ok(Reply::NotModified)
        });
        let result = service.dispatch("typed", json!({ "wrong": 1 }), Session::new());
        assert!(matches!(result, Err(HandlerError::DecodeFailed(_))));
    }

    #[test]
    fn commands_list() {
        let service = test_service()
            .command("a", |_| Ok(Reply::NotModified))
            .command("b", |_| Ok(Reply::NotModified));
        let mut cmds = service.commands();
        cmds.sort();
        assert_eq!(cmds, vec!["a", "b"]);
    }

    #[test]
    fn guard_passes() {
        let service = test_service().command_guarded(
            "greet",
            |ctx| ctx.has_fields(&["name"]),
            |ctx| {
                let name = ctx.raw_input()["name"].as_str().unwrap();
                Ok(Reply::Json(json!({ "hello": name })))
            },
        );
        let reply = service
            .dispatch("greet", json!({ "name": "Pat" }), Session::new())
            .unwrap();
        assert_eq!(reply, Reply::Json(json!({ "hello": "Pat" })));
    }

    #[test]
    fn guard_rejects() {
        let service = test_service().command_guarded(
            "greet",
            |ctx| ctx.has_fields(&["name"]),
            |_ctx| panic!("handler should not run"),
        );
        let result = service.dispatch("greet", json!({ "wrong": 1 }), Session::new());
        assert!(matches!(result, Err(HandlerError::InvalidPatch(_))));
    }

    #[test]
    fn session_reaches_the_handler() {
        let service = test_service().command("check", |ctx| {
            Ok(Reply::Json(json!({ "token": ctx.if_none_match() })))
        });

        let mut session = Session::new();
        session.set("if-none-match", "abc123");
        let reply = service.dispatch("check", json!({}), session).unwrap();
        assert_eq!(reply, Reply::Json(json!({ "token": "abc123" })));
    }

    #[test]
    fn dispatch_request_success() {
        let service =
            test_service().command("ping", |_ctx| Ok(Reply::Json(json!({ "pong": true }))));
        let request = CommandRequest {
            command: "ping".to_string(),
            input: json!({}),
            session_variables: HashMap::new(),
        };
        let response = service.dispatch_request(&request);
        assert_eq!(response.status, 200);
        assert_eq!(response.validator, None);
        assert_eq!(response.body, Some(json!({ "pong": true })));
    }

    #[test]
    fn dispatch_request_not_modified_has_no_body() {
        let service = test_service().command("read", |_ctx| Ok(Reply::NotModified));
        let response = service.dispatch_request(&CommandRequest {
            command: "read".to_string(),
            input: json!({}),
            session_variables: HashMap::new(),
        });
        assert_eq!(response.status, 304);
        assert_eq!(response.validator, None);
        assert_eq!(response.body, None);
    }

    #[test]
    fn dispatch_request_full_content_carries_validator() {
        let service = test_service().command("read", |_ctx| {
            Ok(Reply::FullContent {
                payload: json!({ "name": "Alex" }),
                token: "abc123".to_string(),
            })
        });
        let response = service.dispatch_request(&CommandRequest {
            command: "read".to_string(),
            input: json!({}),
            session_variables: HashMap::new(),
        });
        assert_eq!(response.status, 200);
        assert_eq!(response.validator, Some("abc123".to_string()));
        assert_eq!(response.body, Some(json!({ "name": "Alex" })));
    }

    #[test]
    fn dispatch_request_error_codes() {
        let service = test_service()
            .command("missing", |_| Err(HandlerError::NotFound("ghost".into())))
            .command("bad", |_| {
                Err(HandlerError::InvalidPatch("no preferences".into()))
            });

        let resp = service.dispatch_request(&CommandRequest {
            command: "unknown".to_string(),
            input: json!({}),
            session_variables: HashMap::new(),
        });
        assert_eq!(resp.status, 404);

        let resp = service.dispatch_request(&CommandRequest {
            command: "missing".to_string(),
            input: json!({}),
            session_variables: HashMap::new(),
        });
        assert_eq!(resp.status, 404);

        let resp = service.dispatch_request(&CommandRequest {
            command: "bad".to_string(),
            input: json!({}),
            session_variables: HashMap::new(),
        });
        assert_eq!(resp.status, 400);
    }

    #[test]
    fn dispatch_request_passes_session() {
        let service = test_service().command("check", |ctx| {
            match ctx.if_none_match() {
                Some(_) => Ok(Reply::NotModified),
                None => Ok(Reply::Json(json!({ "cached": false }))),
            }
        });
        let mut vars = HashMap::new();
        vars.insert("if-none-match".to_string(), "abc123".to_string());
        let response = service.dispatch_request(&CommandRequest {
            command: "check".to_string(),
            input: json!({}),
            session_variables: vars,
        });
        assert_eq!(response.status, 304);
    }
}
