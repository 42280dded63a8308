use std::path::PathBuf;

use thiserror::Error;

/// Error type for persistence operations.
///
/// There is no "not found" variant: lookups, updates and deletes by id
/// signal a missing record with `Ok(None)`.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Required configuration (such as the data file path) is not set.
    #[error("configuration error: {0}")]
    Config(String),

    /// The record does not expose an identity field.
    #[error("identity field `id` does not exist on the record")]
    MissingId,

    /// A record with the same identity is already stored.
    #[error("record with id {id} already exists")]
    DuplicateId { id: String },

    /// Reading or writing the backing file failed.
    #[error("failed to {action} data file {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be encoded to or decoded from JSON.
    #[error("{context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A thread panicked while holding the collection lock.
    #[error("persistence lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl PersistenceError {
    pub(crate) fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        PersistenceError::Serialization {
            context: context.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PersistenceError>;
