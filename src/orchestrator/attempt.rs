//! Per-attempt bookkeeping and the terminal success value.

use crate::lease::PhoneLease;
use crate::types::{DeviceId, FullNumber, LeaseId};
use isocountry::CountryCode;
use std::fmt;

/// Where a single attempt ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The attempt is still in flight.
    Pending,
    /// The account was finalized.
    Success,
    /// The number was refused.
    Rejected,
    /// The account was frozen, or a device action failed.
    Frozen,
    /// The account was still unconfirmed after the confirmation step.
    ToConfirm,
    /// No SMS code arrived within the wait window.
    SmsTimeout,
    /// The leased number could not be used at all (acquisition or
    /// delivery-request failure after the lease was granted).
    LeaseFailed,
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Frozen => "frozen",
            Self::ToConfirm => "to confirm",
            Self::SmsTimeout => "sms timeout",
            Self::LeaseFailed => "lease failed",
        };
        write!(f, "{s}")
    }
}

/// One full provisioning cycle on one device.
///
/// Attempts are never resumed: a retry discards the old attempt and
/// starts a fresh one with a fresh lease. At most one lease is active
/// per attempt at any time.
#[derive(Debug)]
pub struct DeviceAttempt {
    device_id: DeviceId,
    attempt_number: u32,
    lease: Option<PhoneLease>,
    outcome: AttemptOutcome,
}

impl DeviceAttempt {
    pub(crate) fn new(device_id: DeviceId, attempt_number: u32) -> Self {
        Self {
            device_id,
            attempt_number,
            lease: None,
            outcome: AttemptOutcome::Pending,
        }
    }

    /// The device this attempt runs on.
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// 1-based attempt number within the provisioning run.
    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    /// The lease owned by this attempt, if one was acquired.
    pub fn lease(&self) -> Option<&PhoneLease> {
        self.lease.as_ref()
    }

    /// The attempt's final outcome, `Pending` while in flight.
    pub fn outcome(&self) -> AttemptOutcome {
        self.outcome
    }

    pub(crate) fn attach_lease(&mut self, lease: PhoneLease) {
        self.lease = Some(lease);
    }

    pub(crate) fn settle(&mut self, outcome: AttemptOutcome) {
        self.outcome = outcome;
    }
}

/// The terminal result of a successful provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccount {
    /// Phone number the account was registered under.
    pub phone_number: FullNumber,
    /// Lease the number came from, already consumed.
    pub lease_id: LeaseId,
    /// Country the number belongs to.
    pub country: CountryCode,
    /// How many attempts the run took, including the successful one.
    pub attempts: u32,
}
