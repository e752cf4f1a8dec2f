//! Order service orchestrating user validation and order persistence.

use item_store::ItemStore;

use crate::directory::{UserDirectory, UserLookupError};
use crate::error::{OrderError, Result};
use crate::order::{INITIAL_STATUS, Order, OrderLine, OrderRecord};

/// Service for managing orders.
///
/// Order creation checks that the user exists through the injected
/// [`UserDirectory`] and only then writes the order. The two steps are not
/// atomic: a user deleted after the check but before the write still ends up
/// referenced by the new order. There is no compensation for that window.
pub struct OrderService<S, U>
where
    S: ItemStore<Item = OrderRecord>,
    U: UserDirectory,
{
    store: S,
    users: U,
}

impl<S, U> OrderService<S, U>
where
    S: ItemStore<Item = OrderRecord>,
    U: UserDirectory,
{
    /// Creates a new order service.
    pub fn new(store: S, users: U) -> Self {
        Self { store, users }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the user directory.
    pub fn users(&self) -> &U {
        &self.users
    }

    /// Creates an order for an existing user.
    ///
    /// The request is validated in full before any I/O, then the user is
    /// looked up fresh, then the order is written with status `pending`.
    /// Either the whole order is persisted or nothing is.
    #[tracing::instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn create_order(&self, user_id: &str, items: Vec<OrderLine>) -> Result<Order> {
        // 1. Validate the request
        if user_id.is_empty() {
            return Err(OrderError::InvalidInput("user_id is required".to_string()));
        }
        if items.is_empty() {
            return Err(OrderError::InvalidInput(
                "at least one item is required".to_string(),
            ));
        }
        if let Some(position) = items.iter().position(|line| !line.is_valid()) {
            return Err(OrderError::InvalidInput(format!(
                "item {position} needs a product_id and a positive quantity"
            )));
        }

        // 2. Confirm the user exists
        self.ensure_user_exists(user_id).await?;

        // 3. Write the order
        let order_id = common::new_order_id();
        let record = OrderRecord {
            order_id: order_id.clone(),
            user_id: user_id.to_string(),
            items,
            status: INITIAL_STATUS.to_string(),
            created_at: None,
        };

        let created = self
            .store
            .create_if_absent(record)
            .await
            .map_err(|e| OrderError::from_store(e, &order_id))?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(%order_id, user_id, "order created");
        Ok(created.into())
    }

    /// Loads an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> Result<Order> {
        if order_id.is_empty() {
            return Err(OrderError::InvalidInput("order_id is required".to_string()));
        }

        let record = self
            .store
            .get_by_key(order_id)
            .await
            .map_err(|e| OrderError::from_store(e, order_id))?;
        Ok(record.into())
    }

    async fn ensure_user_exists(&self, user_id: &str) -> Result<()> {
        match self.users.fetch_user(user_id).await {
            Ok(_) => {
                metrics::counter!("order_user_lookups_total", "outcome" => "found").increment(1);
                Ok(())
            }
            Err(UserLookupError::NotFound(_)) => {
                metrics::counter!("order_user_lookups_total", "outcome" => "not_found")
                    .increment(1);
                Err(OrderError::InvalidInput(format!(
                    "user does not exist: {user_id}"
                )))
            }
            Err(UserLookupError::InvalidArgument(reason)) => {
                metrics::counter!("order_user_lookups_total", "outcome" => "invalid")
                    .increment(1);
                Err(OrderError::InvalidInput(format!(
                    "user_id {user_id} is not valid: {reason}"
                )))
            }
            Err(UserLookupError::Unavailable(reason)) => {
                metrics::counter!("order_user_lookups_total", "outcome" => "error").increment(1);
                tracing::warn!(user_id, %reason, "user lookup failed");
                Err(OrderError::UserService(reason))
            }
        }
    }
}
