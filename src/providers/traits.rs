//! Provider trait definition.

use crate::errors::RetryableError;
use crate::types::{FullNumber, LeaseId, SmsCode};
use isocountry::CountryCode;
use std::error::Error as StdError;
use std::future::Future;

/// Wire-level operations against a remote SMS number-leasing service.
///
/// The lease client builds its lease lifecycle on top of this trait;
/// implementations only translate calls to the remote protocol and
/// classify errors via [`RetryableError`].
///
/// All async methods return `Send` futures so providers compose with
/// multi-threaded executors.
pub trait Provider: Send + Sync + Clone {
    /// Error type returned by provider operations.
    type Error: StdError + RetryableError + Send + Sync + 'static;

    /// Reserve a phone number for the given country.
    ///
    /// Side effect: a billable reservation on the remote service.
    ///
    /// # Returns
    /// * `lease_id` - service-assigned identifier for the reservation
    /// * `full_number` - the reserved number, dial code included
    fn acquire_number(
        &self,
        country: CountryCode,
    ) -> impl Future<Output = Result<(LeaseId, FullNumber), Self::Error>> + Send;

    /// Signal the service that the number is ready to receive its SMS.
    ///
    /// Must be called once per lease before polling for the code.
    fn mark_ready(
        &self,
        lease_id: &LeaseId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Check whether a verification code has arrived.
    ///
    /// # Returns
    /// * `Some(code)` - a code was received
    /// * `None` - nothing yet, caller should poll again
    fn poll_code(
        &self,
        lease_id: &LeaseId,
    ) -> impl Future<Output = Result<Option<SmsCode>, Self::Error>> + Send;

    /// Mark the reservation as successfully used.
    fn finish(&self, lease_id: &LeaseId) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Release the reservation.
    ///
    /// Called on timeout, on permanent errors and whenever an attempt
    /// abandons its lease.
    fn cancel(&self, lease_id: &LeaseId) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Countries this provider can lease numbers for.
    ///
    /// Default implementation returns an empty list, meaning availability
    /// is only discoverable by trying.
    fn available_countries(&self) -> Vec<CountryCode> {
        Vec::new()
    }
}
