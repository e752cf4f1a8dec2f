//! Caller deadlines carried in the `connect-timeout-ms` header.
//!
//! A handler runs its domain call inside [`within`], which bounds the call and
//! records the deadline for the current task. Outbound RPCs made from inside
//! that call read it back through [`budget`] so a downstream server never gets
//! more time than the caller has left.

use std::future::Future;
use std::time::Duration;

use axum::http::HeaderMap;
use common::rpc::TIMEOUT_HEADER;
use tokio::time::Instant;

use crate::error::RpcError;

tokio::task_local! {
    static DEADLINE: Instant;
}

/// Reads the caller's deadline from the `connect-timeout-ms` header, if any.
pub fn from_headers(headers: &HeaderMap) -> Result<Option<Duration>, RpcError> {
    let Some(value) = headers.get(TIMEOUT_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map(|ms| Some(Duration::from_millis(ms)))
        .ok_or_else(|| RpcError::invalid_argument(format!("invalid {TIMEOUT_HEADER} header")))
}

/// Runs `call` under the caller's deadline.
///
/// When the deadline passes, `call` is dropped and any I/O it had in flight
/// is abandoned.
pub async fn within<T, F>(headers: &HeaderMap, call: F) -> Result<T, RpcError>
where
    F: Future<Output = Result<T, RpcError>>,
{
    // A deadline too far out to represent is no deadline at all.
    let at = from_headers(headers)?.and_then(|limit| Instant::now().checked_add(limit));
    match at {
        Some(at) => {
            DEADLINE
                .scope(at, tokio::time::timeout_at(at, call))
                .await
                .map_err(|_| RpcError::internal("deadline exceeded"))?
        }
        None => call.await,
    }
}

/// Time left before the current caller's deadline, if one is in scope.
pub fn remaining() -> Option<Duration> {
    DEADLINE
        .try_with(|at| at.saturating_duration_since(Instant::now()))
        .ok()
}

/// Time an outbound call may take: `configured`, capped by the caller's remaining deadline.
pub fn budget(configured: Duration) -> Duration {
    remaining().map_or(configured, |left| left.min(configured))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use common::Code;

    use super::*;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TIMEOUT_HEADER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_missing_header_means_no_deadline() {
        assert_eq!(from_headers(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn test_header_is_milliseconds() {
        assert_eq!(
            from_headers(&headers_with("1500")),
            Ok(Some(Duration::from_millis(1500)))
        );
    }

    #[test]
    fn test_garbage_header_is_invalid_argument() {
        let err = from_headers(&headers_with("soon")).unwrap_err();
        assert_eq!(err.code, Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_slow_call_is_cut_off() {
        let result: Result<(), RpcError> = within(&headers_with("20"), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert_eq!(result, Err(RpcError::internal("deadline exceeded")));
    }

    #[tokio::test]
    async fn test_budget_is_capped_by_caller_deadline() {
        let configured = Duration::from_secs(5);

        let inside = within(&headers_with("200"), async { Ok(budget(configured)) })
            .await
            .unwrap();
        assert!(inside <= Duration::from_millis(200));

        let roomy = within(&headers_with("60000"), async { Ok(budget(configured)) })
            .await
            .unwrap();
        assert_eq!(roomy, configured);
    }

    #[tokio::test]
    async fn test_unrepresentable_deadline_is_ignored() {
        let headers = headers_with("18446744073709551615");
        let result = within(&headers, async { Ok(remaining()) }).await.unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_budget_without_caller_deadline_is_configured() {
        assert_eq!(remaining(), None);
        assert_eq!(budget(Duration::from_secs(3)), Duration::from_secs(3));
    }
}
