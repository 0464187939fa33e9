//! Lease client trait definition.

use super::error::LeaseClientError;
use crate::lease::PhoneLease;
use crate::types::SmsCode;
use isocountry::CountryCode;
use std::future::Future;

/// Lease lifecycle operations the orchestrator depends on.
///
/// This is the seam between the provisioning state machine and the
/// remote SMS service: production code uses
/// [`SmsLeaseClient`](super::SmsLeaseClient), tests plug in an in-memory
/// implementation.
pub trait SmsLeaseClientTrait: Send + Sync {
    /// Acquire a fresh lease for the given country.
    ///
    /// Transient remote failures are retried internally within the
    /// client's attempt budget; an explicit no-numbers response fails
    /// immediately with [`LeaseClientError::NoNumbersAvailable`].
    fn acquire_number(
        &self,
        country: CountryCode,
    ) -> impl Future<Output = Result<PhoneLease, LeaseClientError>> + Send;

    /// Ask the service to deliver the verification SMS for this lease.
    ///
    /// Transitions the lease to `CodeRequested`; calling it twice on the
    /// same lease is a state error.
    fn request_code(
        &self,
        lease: &mut PhoneLease,
    ) -> impl Future<Output = Result<(), LeaseClientError>> + Send;

    /// Poll until a code arrives or the configured wait window elapses.
    ///
    /// On timeout the lease is cancelled server-side and
    /// [`LeaseClientError::SmsTimeout`] is returned. A zero timeout fails
    /// immediately without a single poll.
    fn wait_for_code(
        &self,
        lease: &mut PhoneLease,
    ) -> impl Future<Output = Result<SmsCode, LeaseClientError>> + Send;

    /// Mark the lease as consumed after the account was finalized.
    ///
    /// The remote finish call is best-effort; only an out-of-order lease
    /// state fails here.
    fn consume(
        &self,
        lease: &mut PhoneLease,
    ) -> impl Future<Output = Result<(), LeaseClientError>> + Send;

    /// Release the lease. Best-effort and idempotent: failures are
    /// logged, never returned, and a second call is a no-op.
    fn cancel_lease(&self, lease: &mut PhoneLease) -> impl Future<Output = ()> + Send;
}
