//! Bounded retry for operations that may need a fresh attempt.
//!
//! Each attempt reports either success, a [`Attempt::Retry`] request, or a
//! [`Attempt::Fatal`] error that stops the loop immediately. Attempts run
//! back to back without delay.

use std::future::Future;
use std::iter;
use std::time::Duration;
use tokio_retry::RetryIf;

/// Failure of a single attempt.
#[derive(Debug)]
pub enum Attempt<E> {
    /// The attempt lost a race (for example a code collision); try again.
    Retry,
    /// Unrecoverable failure; stop retrying.
    Fatal(E),
}

/// Final outcome of [`bounded_retry`] when no attempt succeeded.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts")]
    Exhausted { attempts: usize },

    #[error("attempt failed")]
    Fatal(E),
}

/// Runs `op` up to `max_attempts` times, stopping at the first success or
/// fatal error.
///
/// # Errors
///
/// - [`RetryError::Exhausted`] if every attempt returned [`Attempt::Retry`]
/// - [`RetryError::Fatal`] with the error of the first fatal attempt
pub async fn bounded_retry<T, E, F, Fut>(max_attempts: usize, op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Attempt<E>>>,
{
    let retries = iter::repeat(Duration::ZERO).take(max_attempts.saturating_sub(1));

    RetryIf::start(retries, op, |e: &Attempt<E>| matches!(e, Attempt::Retry))
        .await
        .map_err(|e| match e {
            Attempt::Retry => RetryError::Exhausted {
                attempts: max_attempts.max(1),
            },
            Attempt::Fatal(e) => RetryError::Fatal(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_succeeds_on_first_attempt() {
        let calls = AtomicUsize::new(0);

        let result: Result<u32, RetryError<()>> = bounded_retry(5, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_retries() {
        let calls = AtomicUsize::new(0);

        let result: Result<usize, RetryError<()>> = bounded_retry(5, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { if n < 3 { Err(Attempt::Retry) } else { Ok(n) } }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_after_max_attempts() {
        let calls = AtomicUsize::new(0);

        let result: Result<(), RetryError<()>> = bounded_retry(5, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Attempt::Retry) }
        })
        .await;

        assert_eq!(result, Err(RetryError::Exhausted { attempts: 5 }));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_fatal_stops_immediately() {
        let calls = AtomicUsize::new(0);

        let result: Result<(), RetryError<&str>> = bounded_retry(5, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Attempt::Fatal("store down")) }
        })
        .await;

        assert_eq!(result, Err(RetryError::Fatal("store down")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
