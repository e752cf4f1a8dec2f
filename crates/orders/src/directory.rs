//! User lookup capability and an in-memory implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// What the order service learns about a user from the user service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Ways a user lookup can fail, as reported by the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserLookupError {
    /// The user service has no such user.
    #[error("user not found: {0}")]
    NotFound(String),

    /// The user service rejected the lookup request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other failure, including transport errors and timeouts.
    #[error("user service unavailable: {0}")]
    Unavailable(String),
}

/// Fetches users by ID from wherever they live.
///
/// Every call must reach the source of truth; implementations must not cache.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches the user with the given ID.
    async fn fetch_user(&self, user_id: &str) -> Result<UserSnapshot, UserLookupError>;
}

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    users: HashMap<String, UserSnapshot>,
    fail_with: Option<UserLookupError>,
}

/// In-memory user directory for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    state: Arc<RwLock<InMemoryDirectoryState>>,
    lookups: Arc<AtomicUsize>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user so that lookups for `user_id` succeed.
    pub fn add_user(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        let snapshot = UserSnapshot {
            user_id: user_id.clone(),
            email: format!("{user_id}@example.com"),
            name: user_id.clone(),
            created_at: Utc::now(),
        };
        self.write_state().users.insert(user_id, snapshot);
    }

    /// Forgets a user so that lookups for `user_id` report not found.
    pub fn remove_user(&self, user_id: &str) {
        self.write_state().users.remove(user_id);
    }

    /// Makes every lookup fail with `error` until cleared with `None`.
    pub fn set_failure(&self, error: Option<UserLookupError>) {
        self.write_state().fail_with = error;
    }

    /// Returns how many lookups have been made.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryDirectoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn fetch_user(&self, user_id: &str) -> Result<UserSnapshot, UserLookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(error) = &state.fail_with {
            return Err(error.clone());
        }
        state
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| UserLookupError::NotFound(user_id.to_string()))
    }
}
