//! Submission outcome classification.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;

use crate::types::DeviceId;

/// Verdict over the on-device state after a number submission.
///
/// This is the single decision point driving the orchestrator's
/// branching. Exactly one of the four outcomes is produced per
/// classification; anything a classifier cannot place in the first
/// three buckets must map to [`Rejected`](SubmissionOutcome::Rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The number was accepted and a verification code is on its way.
    Success,
    /// The number was refused outright.
    Rejected,
    /// The account or number was frozen by the service.
    Frozen,
    /// The service asks for an extra account confirmation step.
    ToConfirm,
}

impl SubmissionOutcome {
    /// Map a raw classifier label to an outcome.
    ///
    /// Matching is case-insensitive and whitespace-trimmed. Labels
    /// outside the known set degrade to `Rejected`, which routes them to
    /// the clear-and-retry path instead of a success path.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "frozen" => Self::Frozen,
            "to confirm" | "to_confirm" => Self::ToConfirm,
            _ => Self::Rejected,
        }
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Frozen => "frozen",
            Self::ToConfirm => "to confirm",
        };
        write!(f, "{s}")
    }
}

/// A classification verdict with the raw label it was derived from.
///
/// The raw label is kept for diagnostics only; all control flow runs on
/// [`outcome`](Self::outcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub outcome: SubmissionOutcome,
    pub raw_label: String,
}

impl Classification {
    /// Build a classification from a raw label.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw_label = raw.into();
        Self {
            outcome: SubmissionOutcome::from_raw(&raw_label),
            raw_label,
        }
    }

    /// Build a classification directly from a known outcome.
    pub fn from_outcome(outcome: SubmissionOutcome) -> Self {
        Self {
            raw_label: outcome.to_string(),
            outcome,
        }
    }
}

/// Inspects the current on-device state and produces a verdict.
///
/// Production implementations typically screenshot the device and run
/// the image through an OCR backend; tests use scripted fakes.
pub trait OutcomeClassifier: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Classify the app state after a number submission.
    fn classify_submission(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Classification, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(
            SubmissionOutcome::from_raw("success"),
            SubmissionOutcome::Success
        );
        assert_eq!(
            SubmissionOutcome::from_raw("rejected"),
            SubmissionOutcome::Rejected
        );
        assert_eq!(
            SubmissionOutcome::from_raw("frozen"),
            SubmissionOutcome::Frozen
        );
        assert_eq!(
            SubmissionOutcome::from_raw("to confirm"),
            SubmissionOutcome::ToConfirm
        );
    }

    #[test]
    fn test_label_normalization() {
        assert_eq!(
            SubmissionOutcome::from_raw("  SUCCESS "),
            SubmissionOutcome::Success
        );
        assert_eq!(
            SubmissionOutcome::from_raw("To Confirm"),
            SubmissionOutcome::ToConfirm
        );
        assert_eq!(
            SubmissionOutcome::from_raw("TO_CONFIRM"),
            SubmissionOutcome::ToConfirm
        );
    }

    #[test]
    fn test_unknown_label_degrades_to_rejected() {
        assert_eq!(
            SubmissionOutcome::from_raw("banner_detected"),
            SubmissionOutcome::Rejected
        );
        assert_eq!(SubmissionOutcome::from_raw(""), SubmissionOutcome::Rejected);
    }

    #[test]
    fn test_classification_keeps_raw_label() {
        let c = Classification::from_raw("weird screen");
        assert_eq!(c.outcome, SubmissionOutcome::Rejected);
        assert_eq!(c.raw_label, "weird screen");
    }
}
