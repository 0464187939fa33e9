//! Lease client implementation.

use super::config::{LeaseClientConfig, LeaseClientConfigBuilder};
use super::error::LeaseClientError;
use super::traits::SmsLeaseClientTrait;
use crate::errors::RetryableError;
use crate::lease::{LeaseState, PhoneLease};
use crate::providers::traits::Provider;
use crate::types::SmsCode;
use backon::{ConstantBuilder, Retryable};
use isocountry::CountryCode;
use std::fmt::Debug;
use std::time::Instant;

#[cfg(feature = "tracing")]
use tracing::{debug, error, info, warn};

/// Client managing phone-number leases against a remote SMS service.
///
/// Works with any [`Provider`] implementation and owns the lease-level
/// concerns the provider does not: internal retry of transient
/// acquisition failures, the code-polling loop with its wall-clock
/// budget, forward-only lease state transitions and best-effort cleanup.
///
/// # Example
///
/// ```rust,ignore
/// use account_provisioner::{SmsLeaseClient, LeaseClientConfig, SmsLeaseClientTrait};
/// use account_provisioner::providers::sms_activate::{SmsActivateClient, SmsActivateProvider};
/// use isocountry::CountryCode;
///
/// let provider = SmsActivateProvider::new(SmsActivateClient::with_api_key("api_key")?);
/// let client = SmsLeaseClient::with_provider(provider);
///
/// let mut lease = client.acquire_number(CountryCode::GBR).await?;
/// client.request_code(&mut lease).await?;
/// let code = client.wait_for_code(&mut lease).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SmsLeaseClient<P: Provider> {
    provider: P,
    config: LeaseClientConfig,
}

impl<P: Provider> SmsLeaseClient<P> {
    /// Create a new lease client with a provider and configuration.
    pub fn new(provider: P, config: LeaseClientConfig) -> Self {
        Self { provider, config }
    }

    /// Create a new lease client with default configuration.
    pub fn with_provider(provider: P) -> Self {
        Self::new(provider, LeaseClientConfig::default())
    }

    /// Create a new builder.
    pub fn builder(provider: P) -> SmsLeaseClientBuilder<P> {
        SmsLeaseClientBuilder::new(provider)
    }

    /// Get reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get reference to the client configuration.
    pub fn config(&self) -> &LeaseClientConfig {
        &self.config
    }
}

impl<P: Provider> SmsLeaseClientTrait for SmsLeaseClient<P>
where
    P::Error: Debug,
{
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "lease_client.acquire_number",
            skip_all,
            fields(country = %country.alpha2())
        )
    )]
    async fn acquire_number(&self, country: CountryCode) -> Result<PhoneLease, LeaseClientError> {
        let strategy = ConstantBuilder::default()
            .with_delay(self.config.acquire_backoff)
            .with_max_times(self.config.acquire_attempts.saturating_sub(1));

        let provider = self.provider.clone();
        let result = (|| {
            let provider = provider.clone();
            async move { provider.acquire_number(country).await }
        })
        .retry(strategy)
        .when(|err: &P::Error| err.is_retryable())
        .notify(|_err, _duration| {
            #[cfg(feature = "tracing")]
            warn!(
                error = ?_err,
                retry_after_secs = %_duration.as_secs_f64(),
                "Transient error acquiring number, retrying"
            );
        })
        .await;

        let (lease_id, phone_number) = result.map_err(|e| {
            if e.is_no_numbers() {
                LeaseClientError::NoNumbersAvailable { country }
            } else {
                LeaseClientError::provider(e)
            }
        })?;

        if phone_number.is_empty() {
            // Release the bogus reservation before reporting it.
            if let Err(_e) = self.provider.cancel(&lease_id).await {
                #[cfg(feature = "tracing")]
                warn!(error = ?_e, lease_id = %lease_id, "Failed to cancel empty-number lease");
            }
            return Err(LeaseClientError::EmptyNumber { lease_id });
        }

        #[cfg(feature = "tracing")]
        info!(
            lease_id = %lease_id,
            phone_number = %phone_number,
            country = %country.alpha2(),
            "Phone number leased"
        );

        Ok(PhoneLease::new(lease_id, phone_number, country))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "lease_client.request_code",
            skip_all,
            fields(lease_id = %lease.lease_id())
        )
    )]
    async fn request_code(&self, lease: &mut PhoneLease) -> Result<(), LeaseClientError> {
        // State check first so a double request never reaches the wire.
        lease.advance(LeaseState::CodeRequested)?;

        self.provider
            .mark_ready(lease.lease_id())
            .await
            .map_err(|e| LeaseClientError::RequestFailed {
                lease_id: lease.lease_id().clone(),
                source: Box::new(e),
            })?;

        #[cfg(feature = "tracing")]
        debug!("SMS delivery requested");

        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "lease_client.wait_for_code",
            skip_all,
            fields(lease_id = %lease.lease_id())
        )
    )]
    async fn wait_for_code(&self, lease: &mut PhoneLease) -> Result<SmsCode, LeaseClientError> {
        let timeout = self.config.code_wait_timeout;
        let poll_interval = self.config.poll_interval;
        let start = Instant::now();
        let mut poll_count: u32 = 0;

        #[cfg(feature = "tracing")]
        debug!(timeout_secs = %timeout.as_secs_f64(), "Waiting for SMS code");

        loop {
            if start.elapsed() >= timeout {
                #[cfg(feature = "tracing")]
                warn!(
                    timeout_secs = %timeout.as_secs_f64(),
                    poll_count,
                    "SMS wait window elapsed, cancelling lease"
                );

                let lease_id = lease.lease_id().clone();
                self.cancel_lease(lease).await;

                return Err(LeaseClientError::SmsTimeout {
                    timeout,
                    poll_count,
                    lease_id,
                });
            }

            poll_count += 1;
            match self.provider.poll_code(lease.lease_id()).await {
                Ok(Some(code)) => {
                    lease.advance(LeaseState::CodeReceived)?;

                    #[cfg(feature = "tracing")]
                    info!(
                        elapsed_secs = %start.elapsed().as_secs_f64(),
                        poll_count,
                        "SMS code received"
                    );
                    return Ok(code);
                }
                Ok(None) => {
                    // Nothing yet, poll again after the interval.
                }
                Err(e) if !e.is_retryable() => {
                    #[cfg(feature = "tracing")]
                    error!(error = %e, "Permanent error while polling for code");

                    self.cancel_lease(lease).await;
                    return Err(LeaseClientError::provider(e));
                }
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    warn!(error = %_e, "Transient error while polling, continuing");
                }
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "lease_client.consume",
            skip_all,
            fields(lease_id = %lease.lease_id())
        )
    )]
    async fn consume(&self, lease: &mut PhoneLease) -> Result<(), LeaseClientError> {
        lease.advance(LeaseState::Consumed)?;

        // The account is already finalized at this point; a failed finish
        // report must not fail the run.
        if let Err(_e) = self.provider.finish(lease.lease_id()).await {
            #[cfg(feature = "tracing")]
            warn!(error = ?_e, "Failed to report finished activation");
        }

        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "lease_client.cancel_lease",
            skip_all,
            fields(lease_id = %lease.lease_id(), state = %lease.state())
        )
    )]
    async fn cancel_lease(&self, lease: &mut PhoneLease) {
        if !lease.is_active() {
            return;
        }

        if let Err(_e) = self.provider.cancel(lease.lease_id()).await {
            #[cfg(feature = "tracing")]
            warn!(error = ?_e, "Failed to cancel lease on remote service");
        }

        // Active states can always move to Cancelled.
        let _ = lease.advance(LeaseState::Cancelled);

        #[cfg(feature = "tracing")]
        debug!("Lease cancelled");
    }
}

/// Builder for [`SmsLeaseClient`].
#[derive(Debug, Clone)]
pub struct SmsLeaseClientBuilder<P: Provider> {
    provider: P,
    config_builder: LeaseClientConfigBuilder,
}

impl<P: Provider> SmsLeaseClientBuilder<P> {
    /// Create a new builder with the given provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config_builder: LeaseClientConfigBuilder::default(),
        }
    }

    /// Set the code wait timeout.
    pub fn code_wait_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.code_wait_timeout(timeout);
        self
    }

    /// Set the polling interval.
    pub fn poll_interval(mut self, interval: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.poll_interval(interval);
        self
    }

    /// Set the acquisition attempt budget.
    pub fn acquire_attempts(mut self, attempts: usize) -> Self {
        self.config_builder = self.config_builder.acquire_attempts(attempts);
        self
    }

    /// Set the full configuration.
    pub fn config(mut self, config: LeaseClientConfig) -> Self {
        self.config_builder = LeaseClientConfigBuilder::default()
            .code_wait_timeout(config.code_wait_timeout)
            .poll_interval(config.poll_interval)
            .acquire_attempts(config.acquire_attempts)
            .acquire_backoff(config.acquire_backoff);
        self
    }

    /// Build the [`SmsLeaseClient`].
    pub fn build(self) -> SmsLeaseClient<P> {
        SmsLeaseClient::new(self.provider, self.config_builder.build())
    }
}
