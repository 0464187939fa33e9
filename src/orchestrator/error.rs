//! Orchestrator error types.

use crate::client::LeaseClientError;
use crate::errors::RetryableError;
use thiserror::Error;

/// Terminal errors of a provisioning run.
///
/// Everything recoverable is absorbed into the retry loop; what reaches
/// the caller here ends the run for good.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The lease client failed in a way no fresh attempt can fix, most
    /// prominently [`LeaseClientError::NoNumbersAvailable`].
    #[error(transparent)]
    Lease(#[from] LeaseClientError),

    /// The attempt ceiling was reached without a finalized account.
    #[error("gave up after {attempts} provisioning attempts")]
    AttemptsExhausted { attempts: u32 },
}

impl RetryableError for ProvisionError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn is_no_numbers(&self) -> bool {
        match self {
            ProvisionError::Lease(e) => e.is_no_numbers(),
            ProvisionError::AttemptsExhausted { .. } => false,
        }
    }
}
