use repository::StoreError;
use thiserror::Error;

/// Errors raised while building or catching up projections.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The underlying document store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An event payload could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
