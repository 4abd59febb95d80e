//! HTTP transport — maps service replies onto axum responses.
//!
//! Requires the `http` feature. This is the boundary adapter: the core's
//! [`Reply`] variants become status codes and headers here, and nowhere else.
//!
//! ## Routes
//!
//! - `GET /profile/:id` — conditional read. An `If-None-Match` request header
//!   reaches the handler through the session; replies map to `304` with an
//!   empty body or `200` with the payload and an `ETag` header.
//! - `POST /profile/:id` — update. The JSON body is merged with the path id.
//! - `GET /health` — health check returning `{ "ok": true, "commands": [...] }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use etagged::{handlers, service, MemoryStore};
//!
//! let service = Arc::new(handlers::profile_service(store));
//!
//! // Get the router to compose with other axum routes
//! let app = service::router(service.clone());
//!
//! // Or serve directly
//! service::serve(service, "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::handlers::{profile_read, profile_update};

use super::error::HandlerError;
use super::service::{Reply, Service};
use super::session::Session;

/// Build an axum `Router` serving the profile operations via the given service.
pub fn router<S: Send + Sync + 'static>(service: Arc<Service<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/profile/:id", get(read_handler).post(update_handler))
        .with_state(service)
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S: Send + Sync + 'static>(
    service: Arc<Service<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await
}

/// `GET /health` — returns `{ "ok": true, "commands": [...] }`.
async fn health_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
) -> impl IntoResponse {
    let commands: Vec<&str> = service.commands();
    Json(json!({ "ok": true, "commands": commands }))
}

/// `GET /profile/:id` — conditional read with `If-None-Match` support.
async fn read_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let session = session_from_headers(&headers);
    let result = service.dispatch(profile_read::COMMAND, json!({ "id": id }), session);
    reply_response(result)
}

/// `POST /profile/:id` — update with a JSON body; the path id wins over any
/// id field in the body.
async fn update_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let session = session_from_headers(&headers);
    let mut input = body;
    if let Value::Object(fields) = &mut input {
        fields.insert("id".to_string(), Value::String(id));
    }
    let result = service.dispatch(profile_update::COMMAND, input, session);
    reply_response(result)
}

/// Render a dispatch result as an HTTP response.
///
/// The `ETag` header carries the raw 32-hex token, unquoted — token comparison
/// is exact byte equality on both sides of the wire.
fn reply_response(result: Result<Reply, HandlerError>) -> Response {
    match result {
        Ok(Reply::Json(value)) => (StatusCode::OK, Json(value)).into_response(),
        Ok(Reply::NotModified) => StatusCode::NOT_MODIFIED.into_response(),
        Ok(Reply::FullContent { payload, token }) => {
            (StatusCode::OK, [(header::ETAG, token)], Json(payload)).into_response()
        }
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = json!({ "error": e.to_string() });
            (status, Json(body)).into_response()
        }
    }
}

/// Extract session fields from HTTP headers.
///
/// All headers are lowercased and included as session fields, which is how the
/// `If-None-Match` validator reaches the read handler.
fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = std::collections::HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(vars)
}
