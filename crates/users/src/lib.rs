//! User domain service.
//!
//! Owns the user identity lifecycle and is the only writer of the user item
//! table. Other services learn about users through the user RPC surface,
//! never by reading this table.

pub mod error;
pub mod service;
pub mod user;

pub use error::{Result, UserError};
pub use service::UserService;
pub use user::{User, UserRecord, UserUpdate};
