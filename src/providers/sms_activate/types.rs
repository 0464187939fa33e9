//! Response types for the SMS Activate API.

use crate::types::LeaseId;
use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// Response from the `getNumberV2` call.
///
/// Only the fields the lease flow consumes are modeled; the API sends
/// more (cost, operator, timestamps) which serde ignores.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseResponse {
    /// Activation ID, used as the lease identifier.
    #[serde(rename = "activationId")]
    pub lease_id: LeaseId,
    /// Full phone number with dial code.
    pub phone_number: String,
    /// Country calling code as the service reports it.
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Response from the `getStatusV2` call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsStatusResponse {
    /// SMS payload, present once a message arrived.
    pub sms: Option<SmsPayload>,
}

/// Received SMS content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsPayload {
    /// Verification code extracted by the service.
    pub code: String,
    /// Full message text.
    #[serde(default)]
    pub text: String,
}

/// Status codes accepted by the `setStatus` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    /// Number confirmed, SMS delivery may begin.
    ReadyToReceive,
    /// Request one more code for the same number.
    RequestAnotherCode,
    /// Finish the activation successfully.
    Finish,
    /// Cancel the activation.
    Cancel,
}

impl ActivationStatus {
    /// Numeric wire code.
    pub fn code(&self) -> u8 {
        match self {
            Self::ReadyToReceive => 1,
            Self::RequestAnotherCode => 3,
            Self::Finish => 6,
            Self::Cancel => 8,
        }
    }
}

impl Display for ActivationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadyToReceive => write!(f, "ReadyToReceive(1)"),
            Self::RequestAnotherCode => write!(f, "RequestAnotherCode(3)"),
            Self::Finish => write!(f, "Finish(6)"),
            Self::Cancel => write!(f, "Cancel(8)"),
        }
    }
}

/// Acknowledgements returned by `setStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAck {
    /// Readiness confirmed.
    Ready,
    /// Waiting for a new SMS.
    RetryGet,
    /// Activation finished.
    Activation,
    /// Activation cancelled.
    Cancel,
}

impl StatusAck {
    /// Parse the plain-text acknowledgement.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim() {
            "ACCESS_READY" => Some(Self::Ready),
            "ACCESS_RETRY_GET" => Some(Self::RetryGet),
            "ACCESS_ACTIVATION" => Some(Self::Activation),
            "ACCESS_CANCEL" => Some(Self::Cancel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_status_codes() {
        assert_eq!(ActivationStatus::ReadyToReceive.code(), 1);
        assert_eq!(ActivationStatus::RequestAnotherCode.code(), 3);
        assert_eq!(ActivationStatus::Finish.code(), 6);
        assert_eq!(ActivationStatus::Cancel.code(), 8);
    }

    #[test]
    fn test_status_ack_parsing() {
        assert_eq!(StatusAck::from_raw("ACCESS_READY"), Some(StatusAck::Ready));
        assert_eq!(
            StatusAck::from_raw(" ACCESS_CANCEL "),
            Some(StatusAck::Cancel)
        );
        assert_eq!(StatusAck::from_raw("NO_ACTIVATION"), None);
    }

    #[test]
    fn test_lease_response_ignores_extra_fields() {
        let json = r#"{
            "activationId": "123456789",
            "phoneNumber": "447700900123",
            "activationCost": 10.5,
            "countryCode": "44",
            "activationOperator": "vodafone"
        }"#;

        let response: LeaseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.lease_id.as_ref(), "123456789");
        assert_eq!(response.phone_number, "447700900123");
        assert_eq!(response.country_code.as_deref(), Some("44"));
    }

    #[test]
    fn test_sms_status_empty_and_filled() {
        let empty: SmsStatusResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.sms.is_none());

        let filled: SmsStatusResponse = serde_json::from_str(
            r#"{"sms": {"code": "482913", "text": "Your code is 482913"}}"#,
        )
        .unwrap();
        assert_eq!(filled.sms.unwrap().code, "482913");
    }
}
