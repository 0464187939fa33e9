//! Orchestrator configuration.

use isocountry::CountryCode;
use std::time::Duration;

/// Configuration for the [`ProvisioningOrchestrator`](super::ProvisioningOrchestrator).
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Country to lease numbers for.
    pub country: CountryCode,
    /// Ceiling on full provisioning attempts before giving up.
    pub max_attempts: u32,
    /// Whether to rotate the network identity before driving the device.
    pub rotate_identity: bool,
    /// Lower bound of the pacing pause inserted between the lease
    /// acquisition and the first device action.
    pub pace_min: Duration,
    /// Upper bound of the pacing pause. With the `random` feature the
    /// actual pause is drawn uniformly from `[pace_min, pace_max]`;
    /// without it `pace_min` is used as a fixed pause.
    pub pace_max: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            country: CountryCode::FRA,
            max_attempts: 50,
            rotate_identity: true,
            pace_min: Duration::from_millis(100),
            pace_max: Duration::from_millis(1000),
        }
    }
}

impl OrchestratorConfig {
    /// Create a config for the given country with defaults elsewhere.
    pub fn for_country(country: CountryCode) -> Self {
        Self {
            country,
            ..Self::default()
        }
    }

    /// Create a new builder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use account_provisioner::OrchestratorConfig;
    /// use isocountry::CountryCode;
    ///
    /// let config = OrchestratorConfig::builder()
    ///     .country(CountryCode::GBR)
    ///     .max_attempts(10)
    ///     .rotate_identity(false)
    ///     .build();
    ///
    /// assert_eq!(config.max_attempts, 10);
    /// ```
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }

    /// Replace the attempt ceiling.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Enable or disable identity rotation.
    pub fn with_rotate_identity(mut self, rotate: bool) -> Self {
        self.rotate_identity = rotate;
        self
    }
}

/// Builder for [`OrchestratorConfig`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfigBuilder {
    country: CountryCode,
    max_attempts: u32,
    rotate_identity: bool,
    pace_min: Duration,
    pace_max: Duration,
}

impl Default for OrchestratorConfigBuilder {
    fn default() -> Self {
        let defaults = OrchestratorConfig::default();
        Self {
            country: defaults.country,
            max_attempts: defaults.max_attempts,
            rotate_identity: defaults.rotate_identity,
            pace_min: defaults.pace_min,
            pace_max: defaults.pace_max,
        }
    }
}

impl OrchestratorConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the country to lease numbers for.
    ///
    /// Default: France.
    pub fn country(mut self, country: CountryCode) -> Self {
        self.country = country;
        self
    }

    /// Set the attempt ceiling.
    ///
    /// Default: 50.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Enable or disable identity rotation.
    ///
    /// Default: enabled.
    pub fn rotate_identity(mut self, rotate: bool) -> Self {
        self.rotate_identity = rotate;
        self
    }

    /// Set the pacing pause bounds.
    ///
    /// Default: 100ms to 1s.
    pub fn pacing(mut self, min: Duration, max: Duration) -> Self {
        self.pace_min = min;
        self.pace_max = max;
        self
    }

    /// Build the [`OrchestratorConfig`].
    pub fn build(self) -> OrchestratorConfig {
        OrchestratorConfig {
            country: self.country,
            max_attempts: self.max_attempts,
            rotate_identity: self.rotate_identity,
            pace_min: self.pace_min,
            pace_max: self.pace_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.country, CountryCode::FRA);
        assert_eq!(config.max_attempts, 50);
        assert!(config.rotate_identity);
    }

    #[test]
    fn test_builder() {
        let config = OrchestratorConfig::builder()
            .country(CountryCode::PHL)
            .max_attempts(3)
            .rotate_identity(false)
            .pacing(Duration::ZERO, Duration::ZERO)
            .build();

        assert_eq!(config.country, CountryCode::PHL);
        assert_eq!(config.max_attempts, 3);
        assert!(!config.rotate_identity);
        assert_eq!(config.pace_max, Duration::ZERO);
    }
}
