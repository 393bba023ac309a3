//! Retry policies for `/info` requests.

use std::time::Duration;

/// Retry policy for an HTTP request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Fail on the first error.
    #[default]
    None,
    /// Retry on transport failures, timeouts, 429 and 502/503/504.
    /// Every `/info` query is a read, so this is what `InfoHttp` uses.
    Idempotent,
    /// Caller-provided retry parameters.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// The concrete parameters, or `None` when no retries should happen.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(c) => Some(c.clone()),
        }
    }
}

/// Exponential backoff parameters.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial request.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Spread each delay by up to ±25%.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(initial_ms: u64, max_ms: u64, factor: f64) -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            backoff_factor: factor,
            jitter: false,
            retryable_statuses: vec![],
        }
    }

    #[test]
    fn test_policy_config() {
        assert!(RetryPolicy::default().config().is_none());
        let idempotent = RetryPolicy::Idempotent.config().unwrap();
        assert!(idempotent.retryable_statuses.contains(&429));
        assert!(idempotent.retryable_statuses.contains(&503));
    }

    #[test]
    fn test_delay_doubles() {
        let config = fixed(100, 10_000, 2.0);
        let delays: Vec<u128> = (0..3).map(|a| config.delay_for_attempt(a).as_millis()).collect();
        assert_eq!(delays, [100, 200, 400]);
    }

    #[test]
    fn test_delay_caps_at_max() {
        assert_eq!(fixed(1000, 2000, 10.0).delay_for_attempt(3).as_millis(), 2000);
    }

    #[test]
    fn test_jitter_stays_within_range() {
        let config = RetryConfig {
            jitter: true,
            ..fixed(1000, 10_000, 1.0)
        };
        for _ in 0..50 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((750..=1250).contains(&ms));
        }
    }
}
