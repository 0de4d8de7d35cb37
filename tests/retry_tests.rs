/// Retry Tests Module
///
/// This module tests the bounded-retry combinator and the backoff policy:
/// attempt counting, transient-only retries, and the delay curve.
use mail_triage::errors::ProviderError;
use mail_triage::retry::{with_retry, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(
        max_attempts,
        Duration::from_millis(1),
        Duration::from_millis(2),
    )
}

#[cfg(test)]
mod retry_tests {
    use super::*;

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let policy = fast_policy(3);

        let result = with_retry(&policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ProviderError>("ok") }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let policy = fast_policy(3);

        let result = with_retry(&policy, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if attempt < 3 {
                    Err(ProviderError::RateLimit("slow down".to_string()))
                } else {
                    Ok("finally")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "finally");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error_after_exact_attempts() {
        let calls = AtomicU32::new(0);
        let policy = fast_policy(3);

        let result: Result<(), _> = with_retry(&policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::Unavailable("still down".to_string())) }
        })
        .await;

        match result.unwrap_err() {
            ProviderError::Unavailable(msg) => assert_eq!(msg, "still down"),
            other => panic!("Expected Unavailable, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_auth_error_is_never_retried() {
        let calls = AtomicU32::new(0);
        let policy = fast_policy(3);

        let result: Result<(), _> = with_retry(&policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::Auth("revoked".to_string())) }
        })
        .await;

        assert!(matches!(result.unwrap_err(), ProviderError::Auth(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_never_retried() {
        let calls = AtomicU32::new(0);
        let policy = fast_policy(3);

        let result: Result<(), _> = with_retry(&policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::NotFound("gone".to_string())) }
        })
        .await;

        assert!(matches!(result.unwrap_err(), ProviderError::NotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backoff_delay_is_applied_between_attempts() {
        let policy = RetryPolicy::new(
            3,
            Duration::from_millis(20),
            Duration::from_millis(40),
        );
        let start = Instant::now();

        let result: Result<(), _> = with_retry(&policy, || async {
            Err(ProviderError::Network("timeout".to_string()))
        })
        .await;

        assert!(result.is_err());
        // Two sleeps: 20ms then 40ms
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_delay_curve_for_default_call_sites() {
        // Listing: 4s doubling, capped at 10s
        let list = RetryPolicy::new(3, Duration::from_secs(4), Duration::from_secs(10));
        assert_eq!(list.delay_for(1), Duration::from_secs(4));
        assert_eq!(list.delay_for(2), Duration::from_secs(8));
        assert_eq!(list.delay_for(3), Duration::from_secs(10));

        // Metadata fetch: 2s doubling, capped at 5s
        let get = RetryPolicy::new(3, Duration::from_secs(2), Duration::from_secs(5));
        assert_eq!(get.delay_for(1), Duration::from_secs(2));
        assert_eq!(get.delay_for(2), Duration::from_secs(4));
        assert_eq!(get.delay_for(3), Duration::from_secs(5));
    }

    #[test]
    fn test_single_attempt_policy_has_no_delay_slots() {
        let policy = RetryPolicy::new(1, Duration::from_secs(4), Duration::from_secs(10));
        assert_eq!(policy.max_attempts, 1);
    }
}
