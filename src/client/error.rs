//! Lease-client error types.

use crate::errors::RetryableError;
use crate::lease::LeaseStateError;
use crate::types::LeaseId;
use isocountry::CountryCode;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the [`SmsLeaseClient`](super::SmsLeaseClient).
///
/// The orchestrator branches on these kinds: `NoNumbersAvailable` is
/// fatal for the whole run, `RequestFailed` and `SmsTimeout` abandon the
/// current lease and retry with a fresh attempt.
#[derive(Debug, Error)]
pub enum LeaseClientError {
    /// The service has no numbers to lease for this country.
    #[error("no phone numbers available for country {}", country.alpha2())]
    NoNumbersAvailable { country: CountryCode },

    /// Failed to enable SMS delivery for a lease.
    #[error("failed to request SMS delivery for lease {lease_id}: {source}")]
    RequestFailed {
        lease_id: LeaseId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// No code arrived within the wait window.
    #[error(
        "timeout waiting for SMS code after {:.1}s (polled {poll_count} times); lease {lease_id}",
        timeout.as_secs_f64()
    )]
    SmsTimeout {
        /// Configured timeout duration.
        timeout: Duration,
        /// Number of polls performed before giving up.
        poll_count: u32,
        /// The lease that timed out.
        lease_id: LeaseId,
    },

    /// The service handed out a lease with an empty phone number.
    #[error("service returned an empty phone number for lease {lease_id}")]
    EmptyNumber { lease_id: LeaseId },

    /// Error from the underlying provider.
    #[error("SMS provider error: {source}")]
    Provider {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
        /// Whether the same call can be retried.
        is_retryable: bool,
        /// Whether a fresh lease might succeed.
        should_retry_operation: bool,
    },

    /// A lease was used out of order.
    #[error(transparent)]
    LeaseState(#[from] LeaseStateError),
}

impl LeaseClientError {
    pub(crate) fn provider<E>(source: E) -> Self
    where
        E: StdError + RetryableError + Send + Sync + 'static,
    {
        let is_retryable = source.is_retryable();
        let should_retry_operation = source.should_retry_operation();
        Self::Provider {
            source: Box::new(source),
            is_retryable,
            should_retry_operation,
        }
    }
}

impl RetryableError for LeaseClientError {
    fn is_retryable(&self) -> bool {
        match self {
            LeaseClientError::Provider { is_retryable, .. } => *is_retryable,
            LeaseClientError::NoNumbersAvailable { .. }
            | LeaseClientError::RequestFailed { .. }
            | LeaseClientError::SmsTimeout { .. }
            | LeaseClientError::EmptyNumber { .. }
            | LeaseClientError::LeaseState(_) => false,
        }
    }

    fn should_retry_operation(&self) -> bool {
        match self {
            LeaseClientError::Provider {
                should_retry_operation,
                ..
            } => *should_retry_operation,
            LeaseClientError::RequestFailed { .. }
            | LeaseClientError::SmsTimeout { .. }
            | LeaseClientError::EmptyNumber { .. } => true,
            LeaseClientError::NoNumbersAvailable { .. } | LeaseClientError::LeaseState(_) => false,
        }
    }

    fn is_no_numbers(&self) -> bool {
        matches!(self, LeaseClientError::NoNumbersAvailable { .. })
    }
}
