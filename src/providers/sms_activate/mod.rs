//! SMS Activate provider.
//!
//! Adapter for the SMS Activate `handler_api.php` protocol: JSON bodies
//! for `getNumberV2`/`getStatusV2`, plain-text codes for `setStatus` and
//! for every error.

pub(crate) mod client;
pub(crate) mod countries;
pub(crate) mod errors;
pub(crate) mod provider;
pub(crate) mod types;

pub use client::{DEFAULT_API_URL, SmsActivateClient, SmsActivateClientBuilder};
pub use countries::sms_activate_id;
pub use errors::{SmsActivateError, SmsActivateErrorCode, SmsActivateServiceError};
pub use provider::SmsActivateProvider;
pub use types::{ActivationStatus, LeaseResponse, SmsPayload, SmsStatusResponse, StatusAck};
