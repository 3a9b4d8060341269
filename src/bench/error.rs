//! Harness error type.

use thiserror::Error;

use crate::storage::StoreError;

/// A store call made by the executor failed.
///
/// Never retried, never counted, never turned into a non-200 response. It exists to be
/// logged with the key or batch it concerned.
#[derive(Debug, Error)]
#[error("{operation} failed for {subject}: {cause}")]
pub struct StoreOperationFailed {
    pub operation: &'static str,
    pub subject: String,
    #[source]
    pub cause: StoreError,
}

impl StoreOperationFailed {
    pub fn new(operation: &'static str, subject: impl Into<String>, cause: StoreError) -> Self {
        Self {
            operation,
            subject: subject.into(),
            cause,
        }
    }

    /// Reports the failure at info level inside the current request span.
    pub fn log(&self) {
        tracing::info!(
            operation = self.operation,
            subject = %self.subject,
            cause = %self.cause,
            "failed to {}: {}",
            self.operation,
            self.cause
        );
    }
}
