//! Phone-number lease and its lifecycle.

use crate::types::{FullNumber, LeaseId};
use isocountry::CountryCode;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Lifecycle state of a [`PhoneLease`].
///
/// States only move forward along
/// `Leased -> CodeRequested -> CodeReceived -> Consumed`;
/// `Cancelled` and `Expired` are terminal and reachable from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseState {
    /// Number reserved on the remote service, SMS delivery not yet enabled.
    Leased,
    /// Service instructed to deliver the verification SMS.
    CodeRequested,
    /// A verification code has been received.
    CodeReceived,
    /// The account was finalized with this number.
    Consumed,
    /// The lease was released by us before completion.
    Cancelled,
    /// The service-side TTL elapsed.
    Expired,
}

impl LeaseState {
    /// True for `Consumed`, `Cancelled` and `Expired`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Consumed | Self::Cancelled | Self::Expired)
    }

    /// True while the lease still holds a billable reservation
    /// (`Leased`, `CodeRequested` or `CodeReceived`).
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    fn can_advance_to(self, next: LeaseState) -> bool {
        use LeaseState::*;
        match (self, next) {
            (Leased, CodeRequested) => true,
            (CodeRequested, CodeReceived) => true,
            (CodeReceived, Consumed) => true,
            // Abandonment and expiry are allowed from any active state.
            (from, Cancelled) | (from, Expired) => from.is_active(),
            _ => false,
        }
    }
}

impl Display for LeaseState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Leased => "LEASED",
            Self::CodeRequested => "CODE_REQUESTED",
            Self::CodeReceived => "CODE_RECEIVED",
            Self::Consumed => "CONSUMED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        };
        write!(f, "{name}")
    }
}

/// Illegal lease state transition.
#[derive(Debug, Clone, Error)]
#[error("illegal lease transition {from} -> {to} for lease {lease_id}")]
pub struct LeaseStateError {
    /// State the lease was in.
    pub from: LeaseState,
    /// State the caller tried to move to.
    pub to: LeaseState,
    /// The lease concerned.
    pub lease_id: LeaseId,
}

/// A leased, not-yet-verified phone number.
///
/// One lease is owned by exactly one device attempt for its whole
/// lifetime and is never reused across attempts.
#[derive(Debug, Clone)]
pub struct PhoneLease {
    lease_id: LeaseId,
    phone_number: FullNumber,
    country: CountryCode,
    state: LeaseState,
}

impl PhoneLease {
    /// Create a fresh lease in the `Leased` state.
    pub fn new(lease_id: LeaseId, phone_number: FullNumber, country: CountryCode) -> Self {
        Self {
            lease_id,
            phone_number,
            country,
            state: LeaseState::Leased,
        }
    }

    /// The service-assigned lease identifier.
    pub fn lease_id(&self) -> &LeaseId {
        &self.lease_id
    }

    /// The leased phone number, dial code included.
    pub fn phone_number(&self) -> &FullNumber {
        &self.phone_number
    }

    /// The country the number was leased for. Immutable once leased.
    pub fn country(&self) -> CountryCode {
        self.country
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LeaseState {
        self.state
    }

    /// True while the lease holds a billable reservation.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Advance the lease to `next`, enforcing forward-only transitions.
    pub fn advance(&mut self, next: LeaseState) -> Result<(), LeaseStateError> {
        if !self.state.can_advance_to(next) {
            return Err(LeaseStateError {
                from: self.state,
                to: next,
                lease_id: self.lease_id.clone(),
            });
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lease() -> PhoneLease {
        PhoneLease::new(
            LeaseId::from("42"),
            FullNumber::from("447700900123"),
            CountryCode::GBR,
        )
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut l = lease();
        assert_eq!(l.state(), LeaseState::Leased);
        l.advance(LeaseState::CodeRequested).unwrap();
        l.advance(LeaseState::CodeReceived).unwrap();
        l.advance(LeaseState::Consumed).unwrap();
        assert!(l.state().is_terminal());
    }

    #[test]
    fn test_no_backward_transitions() {
        let mut l = lease();
        l.advance(LeaseState::CodeRequested).unwrap();
        assert!(l.advance(LeaseState::Leased).is_err());
        l.advance(LeaseState::CodeReceived).unwrap();
        assert!(l.advance(LeaseState::CodeRequested).is_err());
    }

    #[test]
    fn test_no_skipping_states() {
        let mut l = lease();
        assert!(l.advance(LeaseState::CodeReceived).is_err());
        assert!(l.advance(LeaseState::Consumed).is_err());
    }

    #[test]
    fn test_cancel_from_any_active_state() {
        let mut l = lease();
        l.advance(LeaseState::Cancelled).unwrap();
        assert_eq!(l.state(), LeaseState::Cancelled);

        let mut l = lease();
        l.advance(LeaseState::CodeRequested).unwrap();
        l.advance(LeaseState::Expired).unwrap();
        assert_eq!(l.state(), LeaseState::Expired);
    }

    #[test]
    fn test_terminal_states_stay_terminal() {
        let mut l = lease();
        l.advance(LeaseState::Cancelled).unwrap();
        assert!(l.advance(LeaseState::Cancelled).is_err());
        assert!(l.advance(LeaseState::CodeRequested).is_err());
        assert!(l.advance(LeaseState::Expired).is_err());
    }

    #[test]
    fn test_active_predicate() {
        let mut l = lease();
        assert!(l.is_active());
        l.advance(LeaseState::CodeRequested).unwrap();
        assert!(l.is_active());
        l.advance(LeaseState::Cancelled).unwrap();
        assert!(!l.is_active());
    }
}
