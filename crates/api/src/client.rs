//! HTTP client for the user service RPC surface.

use std::time::Duration;

use async_trait::async_trait;
use common::rpc::{TIMEOUT_HEADER, user_service};
use common::wire::{GetUserRequest, GetUserResponse, UserMessage};
use common::{Code, ErrorBody};
use orders::{UserDirectory, UserLookupError, UserSnapshot};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{convert, deadline};

/// Errors raised while calling the user service.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("invalid user service URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The remote side answered with an RPC error.
    #[error("{code}: {message}")]
    Rpc { code: Code, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Calls the user service over unary JSON RPC.
///
/// Each request gets the configured timeout, cut down to whatever is left of
/// the inbound caller's deadline. The same budget bounds the request locally
/// and travels in the `connect-timeout-ms` header to the server.
#[derive(Debug, Clone)]
pub struct UserServiceClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl UserServiceClient {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        reqwest::Url::parse(base_url).map_err(|err| RemoteError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserMessage, RemoteError> {
        let request = GetUserRequest {
            user_id: user_id.to_string(),
        };
        let response: GetUserResponse = self.call(user_service::GET_USER, &request).await?;
        Ok(response.user)
    }

    async fn call<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, RemoteError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let budget = deadline::budget(self.timeout);
        let response = self
            .client
            .post(&url)
            .timeout(budget)
            .header(TIMEOUT_HEADER, budget.as_millis().to_string())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|err| RemoteError::Decode(err.to_string()));
        }

        let error = serde_json::from_slice::<ErrorBody>(&body).unwrap_or_else(|_| ErrorBody {
            code: Code::from_http_status(status.as_u16()),
            message: String::from_utf8_lossy(&body).into_owned(),
        });
        Err(RemoteError::Rpc {
            code: error.code,
            message: error.message,
        })
    }
}

#[async_trait]
impl UserDirectory for UserServiceClient {
    async fn fetch_user(&self, user_id: &str) -> Result<UserSnapshot, UserLookupError> {
        match self.get_user(user_id).await {
            Ok(message) => Ok(convert::snapshot_from_message(message)),
            Err(RemoteError::Rpc {
                code: Code::NotFound,
                message,
            }) => Err(UserLookupError::NotFound(message)),
            Err(RemoteError::Rpc {
                code: Code::InvalidArgument,
                message,
            }) => Err(UserLookupError::InvalidArgument(message)),
            Err(other) => Err(UserLookupError::Unavailable(other.to_string())),
        }
    }
}
