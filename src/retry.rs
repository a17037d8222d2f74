//! Retry policies with exponential backoff.
//!
//! The TV is slow to wake and often drops the first few requests after
//! standby, so each step of the upload sequence retries on its own
//! schedule. Delays come from `backon`'s exponential builder; the loop
//! itself is a plain `async fn` so it can drive closures that borrow the
//! TV session mutably.

use backon::{BackoffBuilder, ExponentialBuilder};
use std::fmt::Display;
use std::time::Duration;

/// No single wait between attempts exceeds this.
pub const MAX_DELAY: Duration = Duration::from_secs(300);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub attempts: usize,
    pub initial_delay: Duration,
    pub factor: f32,
}

impl RetryPolicy {
    /// Waiting for the TV to come up on the network.
    pub const CONNECT: Self = Self::new(5, Duration::from_secs(10), 2.0);
    /// A full image upload.
    pub const UPLOAD: Self = Self::new(8, Duration::from_secs(10), 1.5);
    /// Selecting an uploaded image as the active art.
    pub const SELECT: Self = Self::new(15, Duration::from_secs(8), 1.5);

    pub const fn new(attempts: usize, initial_delay: Duration, factor: f32) -> Self {
        Self {
            attempts,
            initial_delay,
            factor,
        }
    }

    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(MAX_DELAY)
            .with_factor(self.factor)
            .with_max_times(self.attempts.saturating_sub(1))
    }

    /// The waits between consecutive attempts.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        self.backoff().build()
    }
}

/// Run `op` until it succeeds, `when` rejects the error, or the policy
/// runs out of attempts.
pub async fn run<T, E, F, W>(policy: &RetryPolicy, label: &str, mut op: F, when: W) -> Result<T, E>
where
    F: AsyncFnMut() -> Result<T, E>,
    W: Fn(&E) -> bool,
    E: Display,
{
    let mut delays = policy.delays();
    let mut attempt = 1usize;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !when(&e) => return Err(e),
            Err(e) => match delays.next() {
                Some(delay) => {
                    tracing::warn!(
                        "{} attempt {}/{} failed: {}. Retrying in {:.1}s...",
                        label,
                        attempt,
                        policy.attempts,
                        e,
                        delay.as_secs_f32()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    tracing::error!("{} failed after {} attempts: {}", label, attempt, e);
                    return Err(e);
                }
            },
        }
    }
}

/// HTTP statuses that are worth retrying: 408, 409, 429 and 5xx.
#[must_use]
pub const fn is_retryable_status(code: u16) -> bool {
    matches!(code, 408 | 409 | 429 | 500..=599)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn secs(policy: RetryPolicy) -> Vec<u64> {
        policy.delays().map(|d| d.as_secs()).collect()
    }

    #[test]
    fn connect_policy_doubles() {
        assert_eq!(secs(RetryPolicy::CONNECT), vec![10, 20, 40, 80]);
    }

    #[test]
    fn upload_policy_has_seven_waits() {
        assert_eq!(
            secs(RetryPolicy::UPLOAD),
            vec![10, 15, 22, 33, 50, 75, 113]
        );
    }

    #[test]
    fn delays_are_capped() {
        assert!(RetryPolicy::SELECT.delays().all(|d| d <= MAX_DELAY));
    }

    #[test]
    fn single_attempt_never_waits() {
        let policy = RetryPolicy::new(1, Duration::from_secs(5), 2.0);
        assert_eq!(policy.delays().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(5, Duration::from_secs(1), 2.0);

        let result: Result<u32, String> = run(
            &policy,
            "flaky",
            async || {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err("not yet".to_string())
                } else {
                    Ok(42)
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_all_attempts() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(3, Duration::from_secs(1), 2.0);

        let result: Result<(), String> = run(
            &policy,
            "doomed",
            async || {
                calls.set(calls.get() + 1);
                Err(format!("failure {}", calls.get()))
            },
            |_| true,
        )
        .await;

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_non_retryable_error() {
        let calls = Cell::new(0);

        let result: Result<(), &str> = run(
            &RetryPolicy::UPLOAD,
            "fatal",
            async || {
                calls.set(calls.get() + 1);
                Err("fatal")
            },
            |_| false,
        )
        .await;

        assert_eq!(result, Err("fatal"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable_status(408));
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(502));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(200));
    }
}
