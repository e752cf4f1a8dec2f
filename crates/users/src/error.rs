//! User domain error types.

use item_store::StoreError;
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Caller-supplied data failed validation. Nothing was sent to the store.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No user exists with the given ID.
    #[error("User not found: {user_id}")]
    NotFound { user_id: String },

    /// A freshly generated user ID was already taken.
    #[error("Generated user ID collided with an existing user: {user_id}")]
    KeyCollision { user_id: String },

    /// The user table could not complete the operation.
    #[error("User store error: {0}")]
    Store(#[from] StoreError),
}

impl UserError {
    /// Translates a store failure on `user_id` into a domain error.
    pub(crate) fn from_store(err: StoreError, user_id: &str) -> Self {
        match err {
            StoreError::NotFound { .. } => UserError::NotFound {
                user_id: user_id.to_string(),
            },
            StoreError::AlreadyExists { .. } => UserError::KeyCollision {
                user_id: user_id.to_string(),
            },
            other => UserError::Store(other),
        }
    }
}

/// Result type for user operations.
pub type Result<T> = std::result::Result<T, UserError>;
