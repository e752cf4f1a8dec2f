//! RPC method paths and the error-code set shared by both services.
//!
//! Calls are unary JSON over HTTP POST at `/<package>.<Service>/<Method>`.
//! Failures carry an [`ErrorBody`] and an HTTP status derived from its code.

use serde::{Deserialize, Serialize};

/// Request header carrying the caller's remaining deadline in milliseconds.
pub const TIMEOUT_HEADER: &str = "connect-timeout-ms";

/// User service method paths.
pub mod user_service {
    pub const CREATE_USER: &str = "/user.v1.UserService/CreateUser";
    pub const GET_USER: &str = "/user.v1.UserService/GetUser";
    pub const UPDATE_USER: &str = "/user.v1.UserService/UpdateUser";
    pub const DELETE_USER: &str = "/user.v1.UserService/DeleteUser";
}

/// Order service method paths.
pub mod order_service {
    pub const CREATE_ORDER: &str = "/order.v1.OrderService/CreateOrder";
    pub const GET_ORDER: &str = "/order.v1.OrderService/GetOrder";
}

/// Error codes an RPC call can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    InvalidArgument,
    NotFound,
    Internal,
}

impl Code {
    /// HTTP status used to carry this code.
    pub fn http_status(&self) -> u16 {
        match self {
            Code::InvalidArgument => 400,
            Code::NotFound => 404,
            Code::Internal => 500,
        }
    }

    /// Best-effort code for a failed response whose body could not be decoded.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Code::InvalidArgument,
            404 => Code::NotFound,
            _ => Code::Internal,
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Code::InvalidArgument => "invalid_argument",
            Code::NotFound => "not_found",
            Code::Internal => "internal",
        };
        write!(f, "{name}")
    }
}

/// JSON body of a failed RPC response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: Code,
    #[serde(default)]
    pub message: String,
}
