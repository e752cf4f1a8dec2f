//! Order domain error types.

use item_store::StoreError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Caller-supplied data failed validation, or the referenced user does
    /// not exist. Nothing was written.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No order exists with the given ID.
    #[error("Order not found: {order_id}")]
    NotFound { order_id: String },

    /// The user service could not answer the existence check.
    #[error("User service call failed: {0}")]
    UserService(String),

    /// A freshly generated order ID was already taken.
    #[error("Generated order ID collided with an existing order: {order_id}")]
    KeyCollision { order_id: String },

    /// The order table could not complete the operation.
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),
}

impl OrderError {
    /// Translates a store failure on `order_id` into a domain error.
    pub(crate) fn from_store(err: StoreError, order_id: &str) -> Self {
        match err {
            StoreError::NotFound { .. } => OrderError::NotFound {
                order_id: order_id.to_string(),
            },
            StoreError::AlreadyExists { .. } => OrderError::KeyCollision {
                order_id: order_id.to_string(),
            },
            other => OrderError::Store(other),
        }
    }
}

/// Result type for order operations.
pub type Result<T> = std::result::Result<T, OrderError>;
