//! Device control port.
//!
//! The orchestrator drives an Android device (or emulator) through the
//! account signup screens via this trait. Implementations are remote by
//! nature, wrapping an automation backend such as an appium session or
//! an adb bridge, and every call may fail on transport or app-state
//! problems alike.

use crate::types::{DeviceId, Number, SmsCode};
use isocountry::CountryCode;
use std::error::Error as StdError;
use std::future::Future;

/// Remote-control capability over the target device.
///
/// Calls for the same device are issued strictly sequentially by the
/// orchestrator; implementations do not need to handle concurrent calls
/// per device. Any failure is reported through the associated error and
/// handled by the orchestrator as a frozen-equivalent outcome, so
/// implementations should not retry internally.
pub trait DeviceControlPort: Send + Sync {
    /// Transport or app-state error raised by any device action.
    type Error: StdError + Send + Sync + 'static;

    /// Launch the target app, landing on the signup screen.
    fn launch_app(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Enter the leased phone number on the signup screen.
    ///
    /// The number arrives as its national part; the signup form carries
    /// its own country selector, driven by `country`.
    fn input_phone_number(
        &self,
        device_id: &DeviceId,
        number: &Number,
        country: CountryCode,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Submit the entered number for verification.
    fn confirm_number_submission(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Force-reset the app to a clean state. Called before every retry.
    fn clear_app(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Type the received verification code into the code screen.
    fn input_verification_code(
        &self,
        device_id: &DeviceId,
        code: &SmsCode,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Acknowledge the "confirm this is your account" prompt shown when
    /// the service asks for an extra confirmation step.
    fn confirm_account(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Complete the remaining signup steps after code entry, leaving the
    /// account usable.
    fn finalize_account(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
