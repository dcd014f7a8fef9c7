use thiserror::Error;

use crate::model_id::ModelId;
use crate::version::Version;

/// Error returned by document store operations.
///
/// Errors raised by a [`DocumentStore`](crate::DocumentStore) are handed back
/// to callers unchanged. The only error produced by the versioning layer itself
/// is [`StoreError::VersionExhausted`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document with the same id already exists in the partition.
    #[error("document {id} already exists in partition {partition_key}")]
    Conflict { id: String, partition_key: String },

    /// The requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// Any other failed request, carrying the store's status code.
    #[error("store request failed with status {code}: {message}")]
    Request { code: u16, message: String },

    /// A document could not be converted to or from JSON.
    #[error("document serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// The current version of a model is already the largest representable one.
    #[error("model {model_id} cannot be versioned past {version}")]
    VersionExhausted { model_id: ModelId, version: Version },
}

impl StoreError {
    /// HTTP-style status code of the error, as the document database reports it.
    pub fn code(&self) -> u16 {
        match self {
            StoreError::Conflict { .. } | StoreError::VersionExhausted { .. } => 409,
            StoreError::NotFound => 404,
            StoreError::Request { code, .. } => *code,
            StoreError::Serde(_) => 400,
            StoreError::LockPoisoned(_) => 500,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.code() == 409
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == 404
    }
}
