//! Lease client configuration.

use std::time::Duration;

/// Configuration for the [`SmsLeaseClient`](super::SmsLeaseClient).
///
/// The 45 second code wait is a deliberately tight local budget; the
/// provider keeps the reservation alive much longer (about 20 minutes),
/// but an account flow that has not received its SMS within 45 seconds
/// is better off abandoning the number and retrying fresh.
#[derive(Debug, Clone)]
pub struct LeaseClientConfig {
    /// Maximum time to wait for an SMS code before timing out.
    pub code_wait_timeout: Duration,
    /// Interval between polls while waiting for an SMS code.
    pub poll_interval: Duration,
    /// Attempt budget for number acquisition (transient errors only).
    pub acquire_attempts: usize,
    /// Fixed backoff between acquisition attempts.
    pub acquire_backoff: Duration,
}

impl Default for LeaseClientConfig {
    fn default() -> Self {
        Self {
            code_wait_timeout: Duration::from_secs(45),
            poll_interval: Duration::from_secs(5),
            acquire_attempts: 5,
            acquire_backoff: Duration::from_secs(1),
        }
    }
}

impl LeaseClientConfig {
    /// Create a new builder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use account_provisioner::LeaseClientConfig;
    /// use std::time::Duration;
    ///
    /// let config = LeaseClientConfig::builder()
    ///     .code_wait_timeout(Duration::from_secs(90))
    ///     .poll_interval(Duration::from_secs(3))
    ///     .build();
    ///
    /// assert_eq!(config.code_wait_timeout, Duration::from_secs(90));
    /// ```
    pub fn builder() -> LeaseClientConfigBuilder {
        LeaseClientConfigBuilder::default()
    }

    /// Replace the code wait timeout.
    pub fn with_code_wait_timeout(mut self, timeout: Duration) -> Self {
        self.code_wait_timeout = timeout;
        self
    }

    /// Replace the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Replace the acquisition attempt budget.
    pub fn with_acquire_attempts(mut self, attempts: usize) -> Self {
        self.acquire_attempts = attempts;
        self
    }
}

/// Builder for [`LeaseClientConfig`].
#[derive(Debug, Clone)]
pub struct LeaseClientConfigBuilder {
    code_wait_timeout: Duration,
    poll_interval: Duration,
    acquire_attempts: usize,
    acquire_backoff: Duration,
}

impl Default for LeaseClientConfigBuilder {
    fn default() -> Self {
        let defaults = LeaseClientConfig::default();
        Self {
            code_wait_timeout: defaults.code_wait_timeout,
            poll_interval: defaults.poll_interval,
            acquire_attempts: defaults.acquire_attempts,
            acquire_backoff: defaults.acquire_backoff,
        }
    }
}

impl LeaseClientConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum time to wait for an SMS code.
    ///
    /// Default: 45 seconds.
    pub fn code_wait_timeout(mut self, timeout: Duration) -> Self {
        self.code_wait_timeout = timeout;
        self
    }

    /// Set the polling interval.
    ///
    /// Default: 5 seconds.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the acquisition attempt budget.
    ///
    /// Default: 5.
    pub fn acquire_attempts(mut self, attempts: usize) -> Self {
        self.acquire_attempts = attempts;
        self
    }

    /// Set the fixed backoff between acquisition attempts.
    ///
    /// Default: 1 second.
    pub fn acquire_backoff(mut self, backoff: Duration) -> Self {
        self.acquire_backoff = backoff;
        self
    }

    /// Build the [`LeaseClientConfig`].
    pub fn build(self) -> LeaseClientConfig {
        LeaseClientConfig {
            code_wait_timeout: self.code_wait_timeout,
            poll_interval: self.poll_interval,
            acquire_attempts: self.acquire_attempts,
            acquire_backoff: self.acquire_backoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LeaseClientConfig::default();
        assert_eq!(config.code_wait_timeout, Duration::from_secs(45));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.acquire_attempts, 5);
    }

    #[test]
    fn test_builder() {
        let config = LeaseClientConfig::builder()
            .code_wait_timeout(Duration::from_secs(60))
            .poll_interval(Duration::from_secs(2))
            .acquire_attempts(10)
            .acquire_backoff(Duration::from_millis(250))
            .build();

        assert_eq!(config.code_wait_timeout, Duration::from_secs(60));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.acquire_attempts, 10);
        assert_eq!(config.acquire_backoff, Duration::from_millis(250));
    }

    #[test]
    fn test_with_methods() {
        let config = LeaseClientConfig::default()
            .with_code_wait_timeout(Duration::from_secs(30))
            .with_poll_interval(Duration::from_secs(1));
        assert_eq!(config.code_wait_timeout, Duration::from_secs(30));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }
}
