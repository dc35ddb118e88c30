use thiserror::Error;

use crate::{AggregateId, Version};

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrency conflict occurred when saving a document.
    /// The expected version did not match the stored version. This is a
    /// retryable condition: the caller must reload and reapply.
    #[error(
        "Concurrency conflict for document {document_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        document_id: AggregateId,
        expected: Version,
        actual: Version,
    },

    /// The document was not found in the store.
    #[error("Document not found: {0}")]
    DocumentNotFound(AggregateId),

    /// The transaction was already committed or rolled back.
    #[error("Transaction is no longer open")]
    TransactionClosed,

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
