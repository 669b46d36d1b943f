//! Declarative retry policies (§4.8, §9 "expressed declaratively"): a
//! `(max_attempts, backoff_fn)` pair rather than ad hoc loops per call site.

use crate::error::LlmError;
use std::time::Duration;

pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: fn(u32) -> Duration,
}

/// Empty-`jobs` retries: identical prompt, no backoff (relies on sampler
/// nondeterminism, not on waiting out a transient condition).
pub const RETRY_ON_EMPTY: RetryPolicy = RetryPolicy {
    max_attempts: 3,
    backoff: |_attempt| Duration::ZERO,
};

/// 5xx / rate-limit retries: exponential backoff 2s -> 16s.
pub const RETRY_ON_TRANSIENT: RetryPolicy = RetryPolicy {
    max_attempts: 3,
    backoff: |attempt| Duration::from_secs(2u64.saturating_pow(attempt).min(16)),
};

pub async fn run_with_retry<F, Fut, T>(policy: &RetryPolicy, mut call: F) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, LlmError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(LlmError::Retryable(msg)) if attempt < policy.max_attempts => {
                let backoff = (policy.backoff)(attempt);
                if !backoff.is_zero() {
                    tokio::time::sleep(backoff).await;
                }
                tracing::debug!(attempt, "retrying LLM call after retryable error: {msg}");
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_retryable_errors_up_to_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, LlmError> = run_with_retry(&RETRY_ON_EMPTY, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(LlmError::Retryable("empty jobs".to_string())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_retrying_on_fatal_error() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, LlmError> = run_with_retry(&RETRY_ON_TRANSIENT, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(LlmError::Fatal("bad api key".to_string())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
