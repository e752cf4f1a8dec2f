use thiserror::Error;

/// Errors that can occur when interacting with an item store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No item exists under the key, or a conditional update/delete found it absent.
    #[error("Item not found: {key}")]
    NotFound { key: String },

    /// A conditional insert found the key already taken.
    #[error("Item already exists: {key}")]
    AlreadyExists { key: String },

    /// The request was rejected before reaching the backend.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend could not be reached or failed the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    /// A stored item could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for item store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
