//! Retryable provider wrapper.

use super::traits::Provider;
use crate::errors::RetryableError;
use crate::retry::RetryConfig;
use crate::types::{FullNumber, LeaseId, SmsCode};
use backon::Retryable;
use isocountry::CountryCode;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Callback invoked on each retry, with the error that caused it and the
/// delay until the next attempt.
pub type OnRetryCallback<E> = Arc<dyn Fn(&E, Duration) + Send + Sync>;

/// Wrapper that adds automatic retry to any [`Provider`].
///
/// Implements the same trait; transient errors (per
/// [`RetryableError::is_retryable`]) are retried with the configured
/// backoff. Lifecycle calls (`finish`, `cancel`) pass through unretried
/// because their callers already treat them as best-effort.
///
/// This wrapper is for driving a [`Provider`] directly.
/// [`SmsLeaseClient`](crate::SmsLeaseClient) carries its own bounded
/// acquisition retry; when stacking the wrapper under it, set the
/// client's `acquire_attempts` to 1 so only one retry budget applies.
///
/// # Example
///
/// ```rust,ignore
/// use account_provisioner::{RetryableProvider, RetryConfig};
///
/// let provider = RetryableProvider::with_config(base_provider, RetryConfig::default())
///     .with_on_retry(|error, delay| {
///         eprintln!("retrying in {delay:?}: {error}");
///     });
/// ```
pub struct RetryableProvider<P: Provider> {
    inner: Arc<P>,
    retry_config: RetryConfig,
    on_retry: Option<OnRetryCallback<P::Error>>,
}

impl<P: Provider> Clone for RetryableProvider<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            retry_config: self.retry_config.clone(),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<P: Provider + Debug> Debug for RetryableProvider<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryableProvider")
            .field("inner", &self.inner)
            .field("retry_config", &self.retry_config)
            .field("on_retry", &self.on_retry.as_ref().map(|_| "..."))
            .finish()
    }
}

impl<P: Provider> RetryableProvider<P> {
    /// Wrap a provider with default retry configuration.
    pub fn new(inner: P) -> Self {
        Self::with_config(inner, RetryConfig::default())
    }

    /// Wrap a provider with custom retry configuration.
    pub fn with_config(inner: P, retry_config: RetryConfig) -> Self {
        Self {
            inner: Arc::new(inner),
            retry_config,
            on_retry: None,
        }
    }

    /// Set a callback to be invoked on each retry attempt.
    pub fn with_on_retry<F>(mut self, callback: F) -> Self
    where
        F: Fn(&P::Error, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(callback));
        self
    }

    /// Get reference to the inner provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get reference to the retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }
}

impl<P: Provider> Provider for RetryableProvider<P>
where
    P::Error: Debug,
{
    type Error = P::Error;

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "RetryableProvider::acquire_number",
            skip_all,
            fields(country = %country.alpha2())
        )
    )]
    async fn acquire_number(
        &self,
        country: CountryCode,
    ) -> Result<(LeaseId, FullNumber), Self::Error> {
        let inner = Arc::clone(&self.inner);
        let on_retry = self.on_retry.clone();
        (|| {
            let inner = Arc::clone(&inner);
            async move { inner.acquire_number(country).await }
        })
        .retry(self.retry_config.build_strategy())
        .when(|err: &Self::Error| err.is_retryable())
        .notify(move |err, duration| {
            if let Some(ref callback) = on_retry {
                callback(err, duration);
            }

            let _ = (err, duration);
            #[cfg(feature = "tracing")]
            debug!(
                error = ?err,
                country = %country.alpha2(),
                retry_after_secs = %duration.as_secs_f64(),
                "Retrying acquire_number after transient error"
            );
        })
        .await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "RetryableProvider::mark_ready",
            skip_all,
            fields(lease_id = %lease_id)
        )
    )]
    async fn mark_ready(&self, lease_id: &LeaseId) -> Result<(), Self::Error> {
        let inner = Arc::clone(&self.inner);
        let lease_id_owned = lease_id.clone();
        let on_retry = self.on_retry.clone();
        (|| {
            let inner = Arc::clone(&inner);
            let lease_id = lease_id_owned.clone();
            async move { inner.mark_ready(&lease_id).await }
        })
        .retry(self.retry_config.build_strategy())
        .when(|err: &Self::Error| err.is_retryable())
        .notify(move |err, duration| {
            if let Some(ref callback) = on_retry {
                callback(err, duration);
            }

            let _ = (err, duration);
            #[cfg(feature = "tracing")]
            debug!(
                error = ?err,
                retry_after_secs = %duration.as_secs_f64(),
                "Retrying mark_ready after transient error"
            );
        })
        .await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "RetryableProvider::poll_code",
            skip_all,
            fields(lease_id = %lease_id)
        )
    )]
    async fn poll_code(&self, lease_id: &LeaseId) -> Result<Option<SmsCode>, Self::Error> {
        let inner = Arc::clone(&self.inner);
        let lease_id_owned = lease_id.clone();
        let on_retry = self.on_retry.clone();
        (|| {
            let inner = Arc::clone(&inner);
            let lease_id = lease_id_owned.clone();
            async move { inner.poll_code(&lease_id).await }
        })
        .retry(self.retry_config.build_strategy())
        .when(|err: &Self::Error| err.is_retryable())
        .notify(move |err, duration| {
            if let Some(ref callback) = on_retry {
                callback(err, duration);
            }

            let _ = (err, duration);
            #[cfg(feature = "tracing")]
            debug!(
                error = ?err,
                retry_after_secs = %duration.as_secs_f64(),
                "Retrying poll_code after transient error"
            );
        })
        .await
    }

    async fn finish(&self, lease_id: &LeaseId) -> Result<(), Self::Error> {
        self.inner.finish(lease_id).await
    }

    async fn cancel(&self, lease_id: &LeaseId) -> Result<(), Self::Error> {
        self.inner.cancel(lease_id).await
    }

    fn available_countries(&self) -> Vec<CountryCode> {
        self.inner.available_countries()
    }
}
