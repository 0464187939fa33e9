//! # Account Provisioner
//!
//! A device-account provisioning library: it drives an Android device
//! through messaging-app signup using leased phone numbers from a paid
//! SMS-activation service, retrying with fresh numbers until an account
//! is finalized.
//!
//! The side-effecting dependencies are traits with one production
//! adapter each: [`SmsLeaseClientTrait`] over an SMS provider,
//! [`DeviceControlPort`] over device automation, [`OutcomeClassifier`]
//! over screen inspection and [`IdentityRotator`] over a VPN backend.
//! The [`ProvisioningOrchestrator`] is the state machine tying them
//! together.
//!
//! ## Supported Providers
//!
//! | Provider | Feature | Website |
//! |----------|---------|---------|
//! | SMS Activate | `sms-activate` (default) | <https://sms-activate.org> |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use account_provisioner::{
//!     normalize_country, OrchestratorConfig, ProvisioningOrchestrator,
//!     SmsLeaseClient,
//!     providers::sms_activate::{SmsActivateClient, SmsActivateProvider},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = SmsActivateProvider::new(
//!         SmsActivateClient::with_api_key("your_api_key")?,
//!     );
//!     let lease_client = SmsLeaseClient::with_provider(provider);
//!
//!     let country = normalize_country("canada")?;
//!     let orchestrator = ProvisioningOrchestrator::new(
//!         lease_client,
//!         my_device_port,
//!         my_ocr_classifier,
//!         OrchestratorConfig::for_country(country),
//!     )
//!     .with_rotator(my_vpn_rotator);
//!
//!     let account = orchestrator.provision("emulator-5554".into()).await?;
//!     println!("registered {}", account.phone_number);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ProvisioningOrchestrator<S, D, C, R>
//!   │           │            │       │
//!   │           ▼            ▼       ▼
//!   │   DeviceControlPort  OutcomeClassifier  IdentityRotator
//!   ▼
//! SmsLeaseClient<P>        (lease lifecycle, polling, timeouts,
//!   ▼                       bounded acquisition retry)
//! Provider                 (trait: SmsActivateProvider, etc.)
//! ```
//!
//! [`RetryableProvider`] wraps any [`Provider`] with exponential-backoff
//! retry for callers driving a provider directly, without the lease
//! client's own acquisition retry on top.
//!
//! ## Features
//!
//! - `sms-activate` - SMS Activate provider support (enabled by default)
//! - `tracing` - OpenTelemetry tracing instrumentation (enabled by default)
//! - `random` - randomized pacing between steps (enabled by default)

pub mod classifier;
pub mod client;
pub mod country;
pub mod device;
pub mod errors;
pub mod identity;
pub mod lease;
pub mod orchestrator;
pub mod providers;
pub mod retry;
pub mod types;

// Re-export commonly used types at the crate root
pub use classifier::{Classification, OutcomeClassifier, SubmissionOutcome};
pub use client::{
    LeaseClientConfig, LeaseClientError, SmsLeaseClient, SmsLeaseClientBuilder, SmsLeaseClientTrait,
};
pub use country::{dial_code_for, is_supported, normalize_country, CountryError};
pub use device::DeviceControlPort;
pub use errors::RetryableError;
pub use identity::{IdentityRotator, NoRotation};
pub use lease::{LeaseState, LeaseStateError, PhoneLease};
pub use orchestrator::{
    AttemptOutcome, DeviceAttempt, OrchestratorConfig, ProvisionError, ProvisionedAccount,
    ProvisioningOrchestrator,
};
pub use providers::{Provider, RetryableProvider};
pub use retry::RetryConfig;
pub use types::{DeviceId, DialCode, FullNumber, LeaseId, Number, SmsCode};
