//! Conditioned key-value access to one logical table of items.
//!
//! Every mutation is guarded by the backend's atomic single-item condition
//! (key absent for inserts, key present for updates and deletes). That
//! condition is the only mutual exclusion between concurrent writers.

pub mod error;
pub mod item;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use item::{Item, Update};
pub use memory::InMemoryItemStore;
pub use postgres::PostgresItemStore;
pub use store::ItemStore;
