use std::fmt;

/// Errors from record store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Update patch was missing or malformed; nothing was mutated.
    InvalidPatch(String),
    /// No record with the given id.
    NotFound(String),
    /// A store lock was poisoned by a panicking writer.
    LockPoisoned(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidPatch(msg) => write!(f, "invalid patch: {}", msg),
            StoreError::NotFound(id) => write!(f, "record not found: {}", id),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StoreError {}
