//! Types shared by the user and order services.
//!
//! - [`types`]: server-side key generation for users and orders
//! - [`time`]: the timestamp wire format
//! - [`rpc`]: RPC method paths and the fixed error-code set
//! - [`wire`]: request/response messages carried over RPC

pub mod rpc;
pub mod time;
pub mod types;
pub mod wire;

pub use rpc::{Code, ErrorBody};
pub use time::{format_timestamp, parse_timestamp};
pub use types::{new_order_id, new_user_id};
