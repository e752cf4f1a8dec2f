use async_trait::async_trait;

use crate::{Item, Result, Update};

/// Core trait for item store implementations.
///
/// An item store gives conditioned access to one logical table keyed by a
/// single string attribute. All implementations must be thread-safe
/// (Send + Sync) and must enforce the conditions below atomically in the
/// backend, never by reading first and writing afterwards.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// The record type held by this store.
    type Item: Item;

    /// Reads an item with strong consistency.
    ///
    /// Fails with `NotFound` if no item has the key.
    async fn get_by_key(&self, key: &str) -> Result<Self::Item>;

    /// Inserts an item only if its key is not taken.
    ///
    /// An unset creation timestamp is stamped with the current UTC time right
    /// before the conditional write. Fails with `AlreadyExists` if the key is
    /// taken; the existing item is left untouched. Returns the item as written.
    async fn create_if_absent(&self, item: Self::Item) -> Result<Self::Item>;

    /// Overwrites some attributes of an existing item.
    ///
    /// Rejects an empty update, or one naming the key or creation timestamp,
    /// with `InvalidInput` before contacting the backend. Fails with
    /// `NotFound` if the key is absent. Returns the item as it was written.
    async fn update_if_present(&self, key: &str, update: Update) -> Result<Self::Item>;

    /// Deletes an existing item.
    ///
    /// Fails with `NotFound` if the key is absent.
    async fn delete_if_present(&self, key: &str) -> Result<()>;
}
