//! Exponential backoff for transient provider failures.
//!
//! Retried: timeouts, refused or reset connections, 408, 429 and 5xx.
//! Everything else is returned to the caller on the first attempt.

use std::{future::Future, time::Duration};

use swell_core::ProviderError;
use tracing::warn;

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Attempts after the first one.
  pub max_retries:   u32,
  /// Delay before the first retry; doubles for each one after.
  pub initial_delay: Duration,
  pub max_delay:     Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_retries:   DEFAULT_MAX_RETRIES,
      initial_delay: DEFAULT_INITIAL_DELAY,
      max_delay:     DEFAULT_MAX_DELAY,
    }
  }
}

impl RetryPolicy {
  pub fn new(max_retries: u32) -> Self { Self { max_retries, ..Self::default() } }

  /// A single attempt, no retries.
  pub fn none() -> Self { Self::new(0) }

  /// Delay before retry number `attempt + 1`.
  pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    self.initial_delay.saturating_mul(factor).min(self.max_delay)
  }

  /// Run `op` until it succeeds, fails permanently, or retries run out.
  pub async fn run<T, F, Fut>(&self, provider: &'static str, mut op: F) -> Result<T, ProviderError>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
  {
    let mut attempt = 0;
    loop {
      match op().await {
        Ok(value) => return Ok(value),
        Err(e) if e.is_transient() && attempt < self.max_retries => {
          let delay = self.delay_for_attempt(attempt);
          attempt += 1;
          warn!(provider, attempt, ?delay, error = %e, "transient provider error, retrying");
          tokio::time::sleep(delay).await;
        }
        Err(e) => return Err(e),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU32, Ordering};

  use super::*;

  fn fast(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
      max_retries,
      initial_delay: Duration::from_millis(1),
      max_delay: Duration::from_millis(2),
    }
  }

  fn unavailable() -> ProviderError {
    ProviderError::Status { provider: "test", status: 503, body: String::new() }
  }

  #[test]
  fn delay_doubles_and_caps() {
    let p = RetryPolicy::default();
    assert_eq!(p.delay_for_attempt(0), Duration::from_millis(500));
    assert_eq!(p.delay_for_attempt(1), Duration::from_secs(1));
    assert_eq!(p.delay_for_attempt(2), Duration::from_secs(2));
    assert_eq!(p.delay_for_attempt(10), Duration::from_secs(8));
    assert_eq!(p.delay_for_attempt(40), Duration::from_secs(8));
  }

  #[tokio::test]
  async fn retries_transient_errors_until_success() {
    let calls = &AtomicU32::new(0);
    let result = fast(2)
      .run("test", move || async move {
        if calls.fetch_add(1, Ordering::SeqCst) < 2 { Err(unavailable()) } else { Ok("ok") }
      })
      .await;
    assert_eq!(result.unwrap(), "ok");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn gives_up_after_max_retries() {
    let calls = &AtomicU32::new(0);
    let result: Result<(), _> = fast(1)
      .run("test", move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(unavailable())
      })
      .await;
    assert!(matches!(result, Err(ProviderError::Status { status: 503, .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn permanent_errors_are_not_retried() {
    let calls = &AtomicU32::new(0);
    let result: Result<(), _> = fast(3)
      .run("test", move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Status { provider: "test", status: 401, body: "nope".into() })
      })
      .await;
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
