//! Error types for the SMS Activate provider.

use crate::errors::RetryableError;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::warn;

/// Error codes returned as plain text by the SMS Activate API.
#[derive(Debug, Clone, PartialEq)]
pub enum SmsActivateErrorCode {
    /// No numbers available for the requested country/service.
    ///
    /// Deliberately not transient: the lease client fails acquisition
    /// immediately on it instead of burning its retry budget.
    NoNumbers,
    /// Internal SQL error on service side.
    ErrorSql,
    /// Account blocked by channel limits (temporary).
    ChannelsLimit,
    /// Activation with this id does not exist.
    NoActivation,
    /// Invalid API key.
    BadKey,
    /// Incorrect action.
    BadAction,
    /// Incorrect service code.
    BadService,
    /// Incorrect status value for setStatus.
    BadStatus,
    /// Account banned until the given datetime.
    Banned { until: String },
    /// Cancellation not allowed yet.
    EarlyCancelDenied,
    /// Unrecognized error code.
    Unknown { raw: String },
}

impl SmsActivateErrorCode {
    /// The API code string.
    pub fn code_name(&self) -> &str {
        match self {
            Self::NoNumbers => "NO_NUMBERS",
            Self::ErrorSql => "ERROR_SQL",
            Self::ChannelsLimit => "CHANNELS_LIMIT",
            Self::NoActivation => "NO_ACTIVATION",
            Self::BadKey => "BAD_KEY",
            Self::BadAction => "BAD_ACTION",
            Self::BadService => "BAD_SERVICE",
            Self::BadStatus => "BAD_STATUS",
            Self::Banned { .. } => "BANNED",
            Self::EarlyCancelDenied => "EARLY_CANCEL_DENIED",
            Self::Unknown { raw } => raw.as_str(),
        }
    }

    /// Parse an error code from a raw API response, `None` if the text
    /// does not look like an error at all.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let s = raw.trim();

        let code = match s {
            "NO_NUMBERS" => Self::NoNumbers,
            "ERROR_SQL" => Self::ErrorSql,
            "CHANNELS_LIMIT" => Self::ChannelsLimit,
            "NO_ACTIVATION" => Self::NoActivation,
            "BAD_KEY" => Self::BadKey,
            "BAD_ACTION" => Self::BadAction,
            "BAD_SERVICE" => Self::BadService,
            "BAD_STATUS" => Self::BadStatus,
            "EARLY_CANCEL_DENIED" => Self::EarlyCancelDenied,
            _ => return Self::parse_parametrized(s),
        };

        Some(code)
    }

    // BANNED carries a datetime parameter: BANNED:'YYYY-m-d H-i-s'
    fn parse_parametrized(s: &str) -> Option<Self> {
        static RE_BANNED: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"^BANNED\s*:\s*['"]?([^'"]+)['"]?$"#).unwrap());
        if let Some(cap) = RE_BANNED.captures(s) {
            let until = cap.get(1).map(|m| m.as_str().to_string())?;
            return Some(Self::Banned { until });
        }

        if Self::looks_like_error_code(s) {
            return Some(Self::Unknown { raw: s.to_string() });
        }

        None
    }

    fn looks_like_error_code(s: &str) -> bool {
        if s.is_empty() || s.starts_with("ACCESS_") || s.starts_with("STATUS_") {
            return false;
        }

        const ERROR_PREFIXES: &[&str] = &[
            "NO_", "ERROR_", "BAD_", "WRONG_", "EARLY_", "BANNED", "CHANNELS_", "ORDER_",
        ];
        ERROR_PREFIXES.iter().any(|p| s.starts_with(p))
    }

    /// Transient service-side failures worth retrying the same call for.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ErrorSql | Self::ChannelsLimit)
    }

    /// Whether a fresh lease acquisition might still succeed.
    pub fn should_retry_operation(&self) -> bool {
        match self {
            Self::ErrorSql | Self::ChannelsLimit => true,
            // A stale activation id says nothing about the next lease.
            Self::NoActivation => true,
            Self::NoNumbers
            | Self::BadKey
            | Self::BadAction
            | Self::BadService
            | Self::BadStatus
            | Self::Banned { .. }
            | Self::EarlyCancelDenied
            | Self::Unknown { .. } => false,
        }
    }
}

impl std::fmt::Display for SmsActivateErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_name())
    }
}

/// Error reported by the SMS Activate service itself.
#[derive(Debug, Clone, Error)]
#[error("SMS Activate service error: {code}")]
pub struct SmsActivateServiceError {
    /// Parsed error code.
    pub code: SmsActivateErrorCode,
    /// Original raw response text.
    pub raw: String,
}

/// Parse a service error out of an API response body, if it is one.
pub(crate) fn parse_service_error(raw: &str) -> Option<SmsActivateServiceError> {
    let code = SmsActivateErrorCode::from_raw(raw)?;
    let error = SmsActivateServiceError {
        code,
        raw: raw.trim().to_string(),
    };

    #[cfg(feature = "tracing")]
    warn!(code = %error.code, raw = %error.raw, "SMS Activate returned an error");

    Some(error)
}

/// Error type for SMS Activate client operations.
#[derive(Debug, Error)]
pub enum SmsActivateError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Failed to build the request URL.
    #[error("failed to build request URL: {0}")]
    BuildRequestUrl(#[source] serde_urlencoded::ser::Error),

    /// HTTP transport failure.
    #[error("failed to send HTTP request: {0}")]
    HttpRequest(#[from] reqwest_middleware::Error),

    /// Failed to read the response body.
    #[error("failed to read response body: {0}")]
    ReadResponse(#[source] reqwest::Error),

    /// The service answered with an error code.
    #[error(transparent)]
    Service(SmsActivateServiceError),

    /// Country outside the provider mapping.
    #[error("no SMS Activate mapping for country {}", country.alpha2())]
    CountryMapping { country: isocountry::CountryCode },

    /// Unparseable setStatus response.
    #[error("unexpected setStatus response: {raw}")]
    UnexpectedStatusResponse { raw: String },

    /// Success body that failed JSON decoding.
    #[error("failed to deserialize response: {0}")]
    DeserializeJson(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SmsActivateError>;

impl RetryableError for SmsActivateError {
    fn is_retryable(&self) -> bool {
        match self {
            SmsActivateError::Service(error) => error.code.is_retryable(),
            SmsActivateError::HttpRequest(_) => true,
            SmsActivateError::BuildHttpClient(_)
            | SmsActivateError::BuildRequestUrl(_)
            | SmsActivateError::ReadResponse(_)
            | SmsActivateError::CountryMapping { .. }
            | SmsActivateError::UnexpectedStatusResponse { .. }
            | SmsActivateError::DeserializeJson(_) => false,
        }
    }

    fn should_retry_operation(&self) -> bool {
        match self {
            SmsActivateError::Service(error) => error.code.should_retry_operation(),
            SmsActivateError::HttpRequest(_) => true,
            SmsActivateError::ReadResponse(_) => true,
            SmsActivateError::BuildHttpClient(_)
            | SmsActivateError::BuildRequestUrl(_)
            | SmsActivateError::CountryMapping { .. }
            | SmsActivateError::UnexpectedStatusResponse { .. }
            | SmsActivateError::DeserializeJson(_) => false,
        }
    }

    fn is_no_numbers(&self) -> bool {
        matches!(
            self,
            SmsActivateError::Service(SmsActivateServiceError {
                code: SmsActivateErrorCode::NoNumbers,
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_codes() {
        for (raw, expected) in [
            ("NO_NUMBERS", SmsActivateErrorCode::NoNumbers),
            ("ERROR_SQL", SmsActivateErrorCode::ErrorSql),
            ("BAD_KEY", SmsActivateErrorCode::BadKey),
            ("CHANNELS_LIMIT", SmsActivateErrorCode::ChannelsLimit),
            ("NO_ACTIVATION", SmsActivateErrorCode::NoActivation),
        ] {
            let error = parse_service_error(raw).unwrap();
            assert_eq!(error.code, expected);
            assert_eq!(error.raw, raw);
        }
    }

    #[test]
    fn test_parse_banned_with_datetime() {
        let error = parse_service_error("BANNED:'2026-01-01 00:00:00'").unwrap();
        assert_eq!(
            error.code,
            SmsActivateErrorCode::Banned {
                until: "2026-01-01 00:00:00".to_string()
            }
        );
    }

    #[test]
    fn test_success_bodies_are_not_errors() {
        for raw in [
            "ACCESS_READY",
            "ACCESS_ACTIVATION",
            "ACCESS_CANCEL",
            "STATUS_WAIT_CODE",
            r#"{"activationId":"1"}"#,
        ] {
            assert!(parse_service_error(raw).is_none(), "{raw}");
        }
    }

    #[test]
    fn test_unknown_error_shape_is_captured() {
        let error = parse_service_error("WRONG_SOMETHING_NEW").unwrap();
        assert!(matches!(error.code, SmsActivateErrorCode::Unknown { .. }));
        assert!(!error.code.should_retry_operation());
    }

    #[test]
    fn test_no_numbers_is_not_retryable() {
        assert!(!SmsActivateErrorCode::NoNumbers.is_retryable());
        assert!(!SmsActivateErrorCode::NoNumbers.should_retry_operation());
        assert!(SmsActivateErrorCode::ErrorSql.is_retryable());
    }

    #[test]
    fn test_is_no_numbers_helper() {
        let err = SmsActivateError::Service(parse_service_error("NO_NUMBERS").unwrap());
        assert!(err.is_no_numbers());

        let err = SmsActivateError::Service(parse_service_error("BAD_KEY").unwrap());
        assert!(!err.is_no_numbers());
    }
}
