//! Back-off for task-status polling requests.
//!
//! The client retries exactly one endpoint, `GET /tasks/{id}`. Generation,
//! render, export and schedule calls are POSTs that create work on the
//! server, so a repeat could duplicate it; they always fail on the first
//! error. See [`ApiError::is_transient`] for which failures qualify.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ApiError;

/// Longest single pause between status requests.
const MAX_DELAY: Duration = Duration::from_secs(30);

/// How often and how patiently a status request is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra requests allowed after the first one fails.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_base_ms: 0,
        }
    }

    /// Pause before retry number `retry` (1-based): the base doubled per
    /// earlier retry, capped at 30 s, then scaled by `jitter`.
    #[must_use]
    pub fn delay(&self, retry: u32, jitter: f64) -> Duration {
        let doubled = self
            .backoff_base_ms
            .saturating_mul(1u64 << retry.saturating_sub(1).min(10));
        Duration::from_millis(doubled).min(MAX_DELAY).mul_f64(jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 500,
        }
    }
}

/// Repeats a status request while it fails transiently and the policy
/// allows. Each pause is [`RetryPolicy::delay`] with jitter drawn from
/// 0.75..=1.25 so concurrent pollers drift apart.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    context: &str,
    mut request: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match request().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && retry < policy.max_retries => err,
            Err(err) => return Err(err),
        };
        retry += 1;
        let pause = policy.delay(retry, rand::rng().random_range(0.75..=1.25));
        tracing::warn!(
            retry,
            max_retries = policy.max_retries,
            pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX),
            context,
            error = %err,
            "task status request failed; retrying"
        );
        tokio::time::sleep(pause).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn status_err(status: u16) -> ApiError {
        ApiError::Status {
            endpoint: "GET /tasks/t1".to_owned(),
            status,
            message: "boom".to_owned(),
        }
    }

    fn no_delay(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff_base_ms: 0,
        }
    }

    #[test]
    fn delay_doubles_per_retry_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(1, 1.0), Duration::from_millis(500));
        assert_eq!(policy.delay(3, 1.0), Duration::from_millis(2_000));
        assert_eq!(policy.delay(3, 1.25), Duration::from_millis(2_500));
        assert_eq!(policy.delay(20, 1.0), Duration::from_secs(30));
    }

    #[test]
    fn server_errors_and_429_are_transient() {
        assert!(status_err(503).is_transient());
        assert!(status_err(429).is_transient());
        assert!(!status_err(404).is_transient());
        assert!(!status_err(422).is_transient());
    }

    #[test]
    fn task_failure_is_not_transient() {
        assert!(!ApiError::TaskFailed {
            task_id: "t1".to_owned(),
            message: "render crashed".to_owned(),
        }
        .is_transient());
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(no_delay(3), "test", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ApiError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(no_delay(3), "test", || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(status_err(502))
                } else {
                    Ok::<u32, ApiError>(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(no_delay(2), "test", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status_err(500))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3, "1 attempt + 2 retries");
        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(no_delay(3), "test", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status_err(404))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
    }
}
