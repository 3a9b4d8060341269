//! Store error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::Key;

/// Errors returned by a `Store` backend.
///
/// Serializable so that the store endpoints can ship the exact error to a `RemoteStore`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreError {
    /// No record exists under the key.
    #[error("no such entity: {key}")]
    NotFound { key: Key },

    /// The store could not be reached or refused the call.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    /// A record or response could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// A multi-key write was given a different number of keys and records.
    #[error("batch shape mismatch: {keys} keys for {records} records")]
    InvalidBatch { keys: usize, records: usize },

    /// A multi-key call failed for some of its entries. Which ones is not reported.
    #[error("{failed} of {total} batch entries failed")]
    Batch { failed: usize, total: usize },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Serialization {
                message: err.to_string(),
            }
        } else {
            StoreError::Unavailable {
                message: err.to_string(),
            }
        }
    }
}
