//! Order domain service.
//!
//! Owns the order lifecycle and is the only writer of the order item table.
//! Before an order is written, the referenced user is looked up through a
//! [`UserDirectory`], which in production is the user service's RPC surface.

pub mod directory;
pub mod error;
pub mod order;
pub mod service;

pub use directory::{InMemoryUserDirectory, UserDirectory, UserLookupError, UserSnapshot};
pub use error::{OrderError, Result};
pub use order::{INITIAL_STATUS, Order, OrderLine, OrderRecord};
pub use service::OrderService;
