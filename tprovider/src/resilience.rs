//! Retry backoff policy and operational hook contracts.

use std::time::Duration;

use tcommon::RunId;

use crate::ProviderError;

/// Delay applied before re-invoking the model after a recoverable failure.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl BackoffPolicy {
    pub fn new(initial_backoff: Duration, max_backoff: Duration, backoff_multiplier: f64) -> Self {
        Self {
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
            backoff_multiplier: backoff_multiplier.max(1.0),
        }
    }

    /// Retries immediately.
    pub fn none() -> Self {
        Self {
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.initial_backoff.is_zero()
    }

    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        if self.is_disabled() {
            return Duration::ZERO;
        }

        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let unbounded =
            self.initial_backoff.as_nanos() as f64 * self.backoff_multiplier.powi(exponent);
        if !unbounded.is_finite() || unbounded >= self.max_backoff.as_nanos() as f64 {
            return self.max_backoff;
        }

        Duration::from_nanos(unbounded.round() as u64)
    }
}

pub trait ProviderOperationHooks: Send + Sync {
    fn on_attempt_start(&self, _model: &str, _run_id: &RunId, _attempt: u32) {}

    fn on_retry_scheduled(
        &self,
        _model: &str,
        _run_id: &RunId,
        _attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
    }

    fn on_success(&self, _model: &str, _run_id: &RunId, _attempt: u32, _elapsed: Duration) {}

    fn on_failure(&self, _model: &str, _run_id: &RunId, _attempt: u32, _error: &ProviderError) {}

    /// The model rejected the separate system instruction; later calls fold it
    /// into the user message.
    fn on_system_prompt_fallback(&self, _model: &str, _run_id: &RunId) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_never_waits() {
        let policy = BackoffPolicy::default();
        assert!(policy.is_disabled());
        assert_eq!(policy.backoff_for_attempt(1), Duration::ZERO);
        assert_eq!(policy.backoff_for_attempt(7), Duration::ZERO);
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = BackoffPolicy::new(
            Duration::from_millis(100),
            Duration::from_millis(250),
            2.0,
        );

        assert_eq!(policy.backoff_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for_attempt(3), Duration::from_millis(250));
        assert_eq!(policy.backoff_for_attempt(4), Duration::from_millis(250));
    }

    #[test]
    fn constructor_normalizes_inverted_bounds() {
        let policy = BackoffPolicy::new(Duration::from_millis(300), Duration::from_millis(10), 0.5);
        assert_eq!(policy.max_backoff, Duration::from_millis(300));
        assert_eq!(policy.backoff_multiplier, 1.0);
    }
}
