//! User service providing the user lifecycle operations.

use item_store::{ItemStore, Update};

use crate::error::{Result, UserError};
use crate::user::{User, UserRecord, UserUpdate};

/// Service for managing users.
///
/// All validation happens before the store is contacted. Uniqueness of user
/// IDs is enforced by the store's conditional insert; email addresses are not
/// unique, so two creates with the same email yield two users.
pub struct UserService<S: ItemStore<Item = UserRecord>> {
    store: S,
}

impl<S: ItemStore<Item = UserRecord>> UserService<S> {
    /// Creates a new user service over the given user table.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a user with a freshly generated ID.
    #[tracing::instrument(skip(self))]
    pub async fn create_user(&self, email: &str, name: &str) -> Result<User> {
        require("email", email)?;
        require("name", name)?;

        let user_id = common::new_user_id();
        let record = UserRecord::new(user_id.as_str(), email, name);

        let created = self
            .store
            .create_if_absent(record)
            .await
            .map_err(|e| UserError::from_store(e, &user_id))?;

        metrics::counter!("users_created_total").increment(1);
        tracing::info!(%user_id, "user created");
        Ok(created.into())
    }

    /// Loads a user by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        require("user_id", user_id)?;

        let record = self
            .store
            .get_by_key(user_id)
            .await
            .map_err(|e| UserError::from_store(e, user_id))?;
        Ok(record.into())
    }

    /// Changes a user's email and/or name.
    ///
    /// At least one field must be given, and given fields must be non-empty.
    #[tracing::instrument(skip(self))]
    pub async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        require("user_id", user_id)?;
        if update.is_empty() {
            return Err(UserError::InvalidInput(
                "at least one of email or name must be provided".to_string(),
            ));
        }
        if let Some(email) = &update.email {
            require("email", email)?;
        }
        if let Some(name) = &update.name {
            require("name", name)?;
        }

        let changes = Update::new()
            .set_if_some("email", update.email)
            .set_if_some("name", update.name);

        let record = self
            .store
            .update_if_present(user_id, changes)
            .await
            .map_err(|e| UserError::from_store(e, user_id))?;

        tracing::info!(user_id, "user updated");
        Ok(record.into())
    }

    /// Deletes a user.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        require("user_id", user_id)?;

        self.store
            .delete_if_present(user_id)
            .await
            .map_err(|e| UserError::from_store(e, user_id))?;

        metrics::counter!("users_deleted_total").increment(1);
        tracing::info!(user_id, "user deleted");
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(UserError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}
