//! Backoff configuration for remote-service retries.

use backon::ExponentialBuilder;
use std::time::Duration;

/// Exponential backoff settings used by [`RetryableProvider`](crate::RetryableProvider).
///
/// ```rust
/// use account_provisioner::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::default()
///     .with_min_delay(Duration::from_millis(500))
///     .with_max_retries(5)
///     .with_jitter(true);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the first retry (default: 1 second).
    pub min_delay: Duration,
    /// Ceiling on the delay between retries (default: 30 seconds).
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry (default: 2.0).
    pub factor: f32,
    /// How many retries to attempt after the initial call (default: 3).
    pub max_retries: usize,
    /// Whether to add random jitter to each delay (default: off).
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            factor: 2.0,
            max_retries: 3,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Tight settings for calls sitting inside a polling loop, where a
    /// long backoff would eat into the caller's wall-clock budget.
    pub fn quick() -> Self {
        Self {
            min_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
            factor: 2.0,
            max_retries: 2,
            jitter: false,
        }
    }

    /// Set the delay before the first retry.
    pub fn with_min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    /// Set the ceiling on the delay between retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    pub fn with_factor(mut self, factor: f32) -> Self {
        self.factor = factor;
        self
    }

    /// Set the number of retries after the initial call.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Enable or disable random jitter on the delays.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Build the backon strategy for these settings.
    pub fn build_strategy(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_factor(self.factor)
            .with_max_times(self.max_retries);
        if self.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.min_delay, Duration::from_secs(1));
        assert_eq!(config.max_delay, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert!(!config.jitter);
    }

    #[test]
    fn test_quick_preset_is_tighter_than_default() {
        let quick = RetryConfig::quick();
        let default = RetryConfig::default();
        assert!(quick.min_delay < default.min_delay);
        assert!(quick.max_delay < default.max_delay);
        assert!(quick.max_retries <= default.max_retries);
    }

    #[test]
    fn test_with_methods() {
        let config = RetryConfig::default()
            .with_min_delay(Duration::from_millis(100))
            .with_factor(1.5)
            .with_max_retries(7)
            .with_jitter(true);
        assert_eq!(config.min_delay, Duration::from_millis(100));
        assert_eq!(config.factor, 1.5);
        assert_eq!(config.max_retries, 7);
        assert!(config.jitter);
    }
}
