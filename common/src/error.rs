use std::fmt;

use thiserror::Error;

/// Failures from the entity store. Treated as transient: logged and surfaced
/// to the caller, never retried here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Manga,
    Chapter,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Manga => write!(f, "manga"),
            EntityKind::Chapter => write!(f, "chapter"),
        }
    }
}

/// Error taxonomy of the library services. `Validation` and `Conflict` are
/// raised before any state is mutated.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LibraryError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        LibraryError::NotFound {
            kind,
            id: id.into(),
        }
    }
}
