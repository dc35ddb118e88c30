//! Domain error types.

use repository::StoreError;
use thiserror::Error;

use crate::will::WillError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the document store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An invariant violation in the will aggregate. Always fatal to the
    /// requested operation; no partial state change is committed.
    #[error("Will error: {0}")]
    Will(#[from] WillError),

    /// Document not found.
    #[error("Document not found: {document_id}")]
    DocumentNotFound { document_id: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Returns true if the error is a retryable concurrency conflict.
    ///
    /// Conflicts are distinct from business-invariant violations: the
    /// caller should reload the document and reapply the command.
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::Store(StoreError::ConcurrencyConflict { .. })
        )
    }
}
