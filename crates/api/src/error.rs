//! RPC error type with HTTP response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::{Code, ErrorBody};
use orders::OrderError;
use thiserror::Error;
use users::UserError;

/// Error returned by an RPC handler, carried as `{"code", "message"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: Code,
    pub message: String,
}

impl RpcError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.code == Code::Internal {
            tracing::error!(error = %self.message, "internal rpc error");
        }

        let body = ErrorBody {
            code: self.code,
            message: self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<UserError> for RpcError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidInput(_) => RpcError::invalid_argument(err.to_string()),
            UserError::NotFound { .. } => RpcError::not_found(err.to_string()),
            UserError::KeyCollision { .. } | UserError::Store(_) => {
                tracing::error!(error = %err, "user operation failed");
                RpcError::internal("user operation failed")
            }
        }
    }
}

impl From<OrderError> for RpcError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidInput(_) => RpcError::invalid_argument(err.to_string()),
            OrderError::NotFound { .. } => RpcError::not_found(err.to_string()),
            // Remote failure modes stay out of the response.
            OrderError::UserService(_) => {
                tracing::error!(error = %err, "user lookup failed");
                RpcError::internal("could not verify user")
            }
            OrderError::KeyCollision { .. } | OrderError::Store(_) => {
                tracing::error!(error = %err, "order operation failed");
                RpcError::internal("order operation failed")
            }
        }
    }
}

impl From<JsonRejection> for RpcError {
    fn from(rejection: JsonRejection) -> Self {
        RpcError::invalid_argument(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use item_store::StoreError;

    use super::*;

    #[test]
    fn test_user_error_codes() {
        let err: RpcError = UserError::InvalidInput("email is required".into()).into();
        assert_eq!(err.code, Code::InvalidArgument);
        assert!(err.message.contains("email is required"));

        let err: RpcError = UserError::NotFound {
            user_id: "user-1".into(),
        }
        .into();
        assert_eq!(err.code, Code::NotFound);

        let err: RpcError = UserError::KeyCollision {
            user_id: "user-1".into(),
        }
        .into();
        assert_eq!(err.code, Code::Internal);
    }

    #[test]
    fn test_order_error_codes() {
        let err: RpcError = OrderError::InvalidInput("user does not exist: u1".into()).into();
        assert_eq!(err.code, Code::InvalidArgument);

        let err: RpcError = OrderError::NotFound {
            order_id: "order-1".into(),
        }
        .into();
        assert_eq!(err.code, Code::NotFound);

        let err: RpcError = OrderError::Store(StoreError::InvalidInput("x".into())).into();
        assert_eq!(err.code, Code::Internal);

        let err: RpcError = OrderError::KeyCollision {
            order_id: "order-1".into(),
        }
        .into();
        assert_eq!(err.code, Code::Internal);
        assert!(!err.message.contains("order-1"));
    }

    #[test]
    fn test_remote_failure_is_opaque() {
        let err: RpcError = OrderError::UserService("dial tcp 10.0.0.7: refused".into()).into();
        assert_eq!(err.code, Code::Internal);
        assert!(!err.message.contains("10.0.0.7"));
    }

    #[test]
    fn test_status_follows_code() {
        assert_eq!(
            RpcError::invalid_argument("x").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::not_found("x").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RpcError::internal("x").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
