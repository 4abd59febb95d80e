//! Error types for command handlers.

use std::error::Error;
use std::fmt;

use crate::error::StoreError;

/// Error type for command handler operations.
#[derive(Debug)]
pub enum HandlerError {
    /// No handler registered for this command name.
    UnknownCommand(String),
    /// Payload decode / deserialization failed.
    DecodeFailed(String),
    /// Update input missing or malformed required fields; no mutation occurred.
    InvalidPatch(String),
    /// Record or resource not found.
    NotFound(String),
    /// Record store failure (lock poisoning and the like).
    Store(StoreError),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::UnknownCommand(name) => write!(f, "unknown command: {}", name),
            HandlerError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
            HandlerError::InvalidPatch(msg) => write!(f, "invalid patch: {}", msg),
            HandlerError::NotFound(id) => write!(f, "not found: {}", id),
            HandlerError::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidPatch(msg) => HandlerError::InvalidPatch(msg),
            StoreError::NotFound(id) => HandlerError::NotFound(id),
            StoreError::LockPoisoned(_) => HandlerError::Store(err),
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::InvalidPatch(_) => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::Store(_) => 500,
        }
    }
}
