use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::item::{apply_update, require_key, stamp_created_at, validate_update};
use crate::{Item, ItemStore, Result, StoreError, Update};

/// In-memory item store implementation.
///
/// The write lock around the map plays the role of the backend's atomic
/// conditional write: each condition is checked and applied under one lock
/// acquisition. Clones share the same table.
pub struct InMemoryItemStore<I: Item> {
    items: Arc<RwLock<HashMap<String, I>>>,
    backend_calls: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl<I: Item> InMemoryItemStore<I> {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            backend_calls: Arc::new(AtomicUsize::new(0)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Returns how many operations reached the table.
    ///
    /// Requests rejected during validation are not counted.
    pub fn backend_calls(&self) -> usize {
        self.backend_calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent operation fail as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn enter_backend(&self) -> Result<()> {
        self.backend_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

impl<I: Item> Default for InMemoryItemStore<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Item> Clone for InMemoryItemStore<I> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            backend_calls: Arc::clone(&self.backend_calls),
            unavailable: Arc::clone(&self.unavailable),
        }
    }
}

#[async_trait]
impl<I: Item> ItemStore for InMemoryItemStore<I> {
    type Item = I;

    async fn get_by_key(&self, key: &str) -> Result<I> {
        require_key(key)?;
        self.enter_backend()?;

        let items = self.items.read().await;
        items.get(key).cloned().ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    async fn create_if_absent(&self, mut item: I) -> Result<I> {
        require_key(item.key())?;
        self.enter_backend()?;

        let mut items = self.items.write().await;
        match items.entry(item.key().to_string()) {
            Entry::Occupied(entry) => {
                metrics::counter!("item_store_conditional_failures_total", "operation" => "create")
                    .increment(1);
                Err(StoreError::AlreadyExists {
                    key: entry.key().clone(),
                })
            }
            Entry::Vacant(entry) => {
                stamp_created_at(&mut item);
                entry.insert(item.clone());
                Ok(item)
            }
        }
    }

    async fn update_if_present(&self, key: &str, update: Update) -> Result<I> {
        require_key(key)?;
        validate_update::<I>(&update)?;
        self.enter_backend()?;

        let mut items = self.items.write().await;
        let Some(current) = items.get_mut(key) else {
            metrics::counter!("item_store_conditional_failures_total", "operation" => "update")
                .increment(1);
            return Err(StoreError::NotFound {
                key: key.to_string(),
            });
        };

        let updated = apply_update(current, &update)?;
        *current = updated.clone();
        Ok(updated)
    }

    async fn delete_if_present(&self, key: &str) -> Result<()> {
        require_key(key)?;
        self.enter_backend()?;

        let mut items = self.items.write().await;
        if items.remove(key).is_none() {
            metrics::counter!("item_store_conditional_failures_total", "operation" => "delete")
                .increment(1);
            return Err(StoreError::NotFound {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}
