//! Provisioning orchestrator: the per-device account creation state machine.

pub(crate) mod attempt;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod structure;

pub use attempt::{AttemptOutcome, DeviceAttempt, ProvisionedAccount};
pub use config::{OrchestratorConfig, OrchestratorConfigBuilder};
pub use error::ProvisionError;
pub use structure::ProvisioningOrchestrator;
