// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// Exponential backoff with a growing delay, capped at `max_delay`. There is
/// no attempt cap: `retry_with_backoff` retries until it succeeds, exactly
/// like the original `Backoff(ctx, f, maxBackoffDelay)` it is grounded on,
/// which loops "until the context.Context is done, or the function returns
/// a nil error." The caller supplies the deadline by wrapping the retry in
/// a `tokio::time::timeout` (as `Gossiper`'s fan-out already does via
/// `FANOUT_TIMEOUT`) — dropping the future on timeout is what stops the
/// loop, playing the role `ctx.Done()` plays in the original.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub factor: f64,
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            factor: 1.6,
            max_delay: Duration::from_secs(60),
        }
    }
}

/// Retries `operation` under `policy` until it succeeds. Bounded only by
/// whatever deadline the caller imposes on the returned future (see
/// `BackoffPolicy`'s docs) — there is no attempt limit.
pub async fn retry_with_backoff<F, Fut, T, E>(policy: BackoffPolicy, mut operation: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    let mut delay = policy.initial_delay;

    loop {
        match operation().await {
            Ok(value) => return value,
            Err(e) => {
                warn!(attempt, %e, delay_ms = delay.as_millis() as u64, "retrying after backoff");
                sleep(delay).await;
                attempt += 1;
                delay = delay.mul_f64(policy.factor).min(policy.max_delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_immediately_without_retry() {
        let calls = AtomicU32::new(0);
        retry_with_backoff(BackoffPolicy::default(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<(), &str>(())
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_it_succeeds_after_transient_failures() {
        let policy = BackoffPolicy {
            initial_delay: Duration::from_millis(1),
            factor: 1.6,
            max_delay: Duration::from_millis(5),
        };
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(policy, || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err("boom")
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn is_cancelled_by_the_caller_s_deadline_instead_of_an_attempt_cap() {
        let policy = BackoffPolicy {
            initial_delay: Duration::from_millis(1),
            factor: 1.6,
            max_delay: Duration::from_millis(5),
        };
        let calls = AtomicU32::new(0);
        let outcome = tokio::time::timeout(
            Duration::from_millis(50),
            retry_with_backoff(policy, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), &str>("boom")
            }),
        )
        .await;

        assert!(outcome.is_err(), "retry should still be running when the deadline fires");
        assert!(calls.load(Ordering::SeqCst) > 1, "operation should have retried at least once");
    }

    #[tokio::test]
    async fn delay_is_capped_at_max_delay() {
        let policy = BackoffPolicy {
            initial_delay: Duration::from_millis(10),
            factor: 10.0,
            max_delay: Duration::from_millis(15),
        };
        assert!(policy.initial_delay.mul_f64(policy.factor) > policy.max_delay);
        let capped = policy.initial_delay.mul_f64(policy.factor).min(policy.max_delay);
        assert_eq!(capped, policy.max_delay);
    }
}
