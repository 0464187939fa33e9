//! Provisioning orchestrator implementation.

use super::attempt::{AttemptOutcome, DeviceAttempt, ProvisionedAccount};
use super::config::OrchestratorConfig;
use super::error::ProvisionError;
use crate::classifier::{OutcomeClassifier, SubmissionOutcome};
use crate::client::{LeaseClientError, SmsLeaseClientTrait};
use crate::device::DeviceControlPort;
use crate::errors::RetryableError;
use crate::identity::{IdentityRotator, NoRotation};
use crate::country::dial_code_for;
use crate::lease::PhoneLease;
use crate::types::{DeviceId, Number};
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

/// How a single driven attempt concluded.
enum AttemptEnd {
    /// The account was finalized and the lease consumed.
    Finalized,
    /// The attempt is abandoned; cancel the lease, clear the app, retry.
    Retry(AttemptOutcome),
}

/// Drives one device through account signup until an account is
/// finalized, the attempt ceiling is hit, or the number pool runs dry.
///
/// Each instance runs one device; provisioning several devices in
/// parallel means one orchestrator per device, sharing nothing but the
/// lease client's connection pool. Within an instance all steps are
/// strictly sequential.
///
/// # Example
///
/// ```rust,ignore
/// use account_provisioner::{
///     OrchestratorConfig, ProvisioningOrchestrator, SmsLeaseClient,
/// };
/// use isocountry::CountryCode;
///
/// let orchestrator = ProvisioningOrchestrator::new(
///     lease_client,
///     device_port,
///     ocr_classifier,
///     OrchestratorConfig::for_country(CountryCode::FRA),
/// )
/// .with_rotator(vpn_rotator);
///
/// let account = orchestrator.provision("emulator-5554".into()).await?;
/// println!("registered {}", account.phone_number);
/// ```
#[derive(Debug)]
pub struct ProvisioningOrchestrator<S, D, C, R = NoRotation> {
    lease_client: S,
    device: D,
    classifier: C,
    rotator: Option<R>,
    config: OrchestratorConfig,
}

impl<S, D, C> ProvisioningOrchestrator<S, D, C, NoRotation> {
    /// Create an orchestrator without identity rotation.
    pub fn new(lease_client: S, device: D, classifier: C, config: OrchestratorConfig) -> Self {
        Self {
            lease_client,
            device,
            classifier,
            rotator: None,
            config,
        }
    }
}

impl<S, D, C, R> ProvisioningOrchestrator<S, D, C, R> {
    /// Attach an identity rotator.
    pub fn with_rotator<R2>(self, rotator: R2) -> ProvisioningOrchestrator<S, D, C, R2>
    where
        R2: IdentityRotator,
    {
        ProvisioningOrchestrator {
            lease_client: self.lease_client,
            device: self.device,
            classifier: self.classifier,
            rotator: Some(rotator),
            config: self.config,
        }
    }

    /// Get reference to the orchestrator configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }
}

impl<S, D, C, R> ProvisioningOrchestrator<S, D, C, R>
where
    S: SmsLeaseClientTrait,
    D: DeviceControlPort,
    C: OutcomeClassifier,
    R: IdentityRotator,
{
    /// Run the full provisioning state machine for one device.
    ///
    /// Returns the registered account on success. Recoverable failures
    /// (rejections, frozen screens, SMS timeouts, device faults) are
    /// absorbed into fresh attempts up to the configured ceiling; only a
    /// dry number pool or an unrecoverable lease error unwinds early.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "orchestrator.provision",
            skip_all,
            fields(device_id = %device_id, country = %self.config.country.alpha2())
        )
    )]
    pub async fn provision(
        &self,
        device_id: DeviceId,
    ) -> Result<ProvisionedAccount, ProvisionError> {
        for attempt_number in 1..=self.config.max_attempts {
            let mut attempt = DeviceAttempt::new(device_id.clone(), attempt_number);

            #[cfg(feature = "tracing")]
            info!(attempt_number, "Starting provisioning attempt");

            if let Some(account) = self.run_attempt(&mut attempt).await? {
                return Ok(account);
            }

            #[cfg(feature = "tracing")]
            info!(
                attempt_number,
                outcome = %attempt.outcome(),
                "Attempt failed, retrying with a fresh lease"
            );
        }

        Err(ProvisionError::AttemptsExhausted {
            attempts: self.config.max_attempts,
        })
    }

    /// One attempt: lease, drive, settle. `Ok(None)` means retry.
    async fn run_attempt(
        &self,
        attempt: &mut DeviceAttempt,
    ) -> Result<Option<ProvisionedAccount>, ProvisionError> {
        let device_id = attempt.device_id().clone();

        let mut lease = match self.lease_client.acquire_number(self.config.country).await {
            Ok(lease) => lease,
            Err(e) if e.should_retry_operation() => {
                #[cfg(feature = "tracing")]
                warn!(error = %e, "Lease acquisition failed, will retry");

                attempt.settle(AttemptOutcome::LeaseFailed);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let end = match self.drive_device(&device_id, &mut lease).await {
            Ok(end) => end,
            Err(e) => {
                // A fatal unwind must not strand the reservation either.
                self.lease_client.cancel_lease(&mut lease).await;
                attempt.attach_lease(lease);
                return Err(e);
            }
        };

        match end {
            AttemptEnd::Finalized => {
                attempt.settle(AttemptOutcome::Success);
                let account = ProvisionedAccount {
                    phone_number: lease.phone_number().clone(),
                    lease_id: lease.lease_id().clone(),
                    country: lease.country(),
                    attempts: attempt.attempt_number(),
                };
                attempt.attach_lease(lease);
                Ok(Some(account))
            }
            AttemptEnd::Retry(outcome) => {
                attempt.settle(outcome);

                // Never leak a paid reservation into the next attempt.
                self.lease_client.cancel_lease(&mut lease).await;
                if let Err(_e) = self.device.clear_app(&device_id).await {
                    #[cfg(feature = "tracing")]
                    warn!(error = %_e, "Failed to clear app before retry");
                }

                attempt.attach_lease(lease);
                Ok(None)
            }
        }
    }

    /// Submission, classification and branching for one leased number.
    async fn drive_device(
        &self,
        device_id: &DeviceId,
        lease: &mut PhoneLease,
    ) -> Result<AttemptEnd, ProvisionError> {
        // The registration form wants the national part only.
        let Some(national) = self.national_number(lease) else {
            #[cfg(feature = "tracing")]
            warn!(
                phone_number = %lease.phone_number(),
                country = %lease.country().alpha2(),
                "Leased number does not start with the country dial code"
            );
            return Ok(AttemptEnd::Retry(AttemptOutcome::LeaseFailed));
        };

        self.pace().await;
        self.rotate_identity().await;

        if let Err(_e) = self.device.launch_app(device_id).await {
            #[cfg(feature = "tracing")]
            warn!(error = %_e, "Device action failed: launch app");
            return Ok(AttemptEnd::Retry(AttemptOutcome::Frozen));
        }
        if let Err(_e) = self
            .device
            .input_phone_number(device_id, &national, lease.country())
            .await
        {
            #[cfg(feature = "tracing")]
            warn!(error = %_e, "Device action failed: input phone number");
            return Ok(AttemptEnd::Retry(AttemptOutcome::Frozen));
        }
        if let Err(_e) = self.device.confirm_number_submission(device_id).await {
            #[cfg(feature = "tracing")]
            warn!(error = %_e, "Device action failed: confirm submission");
            return Ok(AttemptEnd::Retry(AttemptOutcome::Frozen));
        }

        let mut outcome = self.classify(device_id).await;
        let mut confirm_available = true;

        loop {
            match outcome {
                SubmissionOutcome::Success => {
                    return self.complete_signup(device_id, lease).await;
                }
                SubmissionOutcome::ToConfirm if confirm_available => {
                    // Confirmation is part of the same attempt; a second
                    // TO_CONFIRM verdict falls through to rejection.
                    confirm_available = false;

                    #[cfg(feature = "tracing")]
                    info!("Account requires confirmation");

                    self.rotate_identity().await;
                    if let Err(_e) = self.device.confirm_account(device_id).await {
                        #[cfg(feature = "tracing")]
                        warn!(error = %_e, "Device action failed: confirm account");
                        return Ok(AttemptEnd::Retry(AttemptOutcome::Frozen));
                    }
                    outcome = self.classify(device_id).await;
                }
                SubmissionOutcome::Rejected => {
                    #[cfg(feature = "tracing")]
                    info!("Number rejected");
                    return Ok(AttemptEnd::Retry(AttemptOutcome::Rejected));
                }
                SubmissionOutcome::ToConfirm => {
                    #[cfg(feature = "tracing")]
                    info!("Account still unconfirmed after the confirmation step");
                    return Ok(AttemptEnd::Retry(AttemptOutcome::ToConfirm));
                }
                SubmissionOutcome::Frozen => {
                    #[cfg(feature = "tracing")]
                    warn!("Account frozen");
                    return Ok(AttemptEnd::Retry(AttemptOutcome::Frozen));
                }
            }
        }
    }

    /// SUCCESS branch: request the SMS, enter the code, finalize.
    async fn complete_signup(
        &self,
        device_id: &DeviceId,
        lease: &mut PhoneLease,
    ) -> Result<AttemptEnd, ProvisionError> {
        match self.lease_client.request_code(lease).await {
            Ok(()) => {}
            Err(e) if e.should_retry_operation() => {
                #[cfg(feature = "tracing")]
                warn!(error = %e, "Failed to request SMS delivery");
                return Ok(AttemptEnd::Retry(AttemptOutcome::LeaseFailed));
            }
            Err(e) => return Err(e.into()),
        }

        let code = match self.lease_client.wait_for_code(lease).await {
            Ok(code) => code,
            Err(_e @ LeaseClientError::SmsTimeout { .. }) => {
                #[cfg(feature = "tracing")]
                warn!(error = %_e, "No SMS code arrived");
                return Ok(AttemptEnd::Retry(AttemptOutcome::SmsTimeout));
            }
            Err(e) if e.should_retry_operation() => {
                #[cfg(feature = "tracing")]
                warn!(error = %e, "Lease became unusable while waiting for the code");
                return Ok(AttemptEnd::Retry(AttemptOutcome::LeaseFailed));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(_e) = self.device.input_verification_code(device_id, &code).await {
            #[cfg(feature = "tracing")]
            warn!(error = %_e, "Device action failed: input verification code");
            return Ok(AttemptEnd::Retry(AttemptOutcome::Frozen));
        }
        if let Err(_e) = self.device.finalize_account(device_id).await {
            #[cfg(feature = "tracing")]
            warn!(error = %_e, "Device action failed: finalize account");
            return Ok(AttemptEnd::Retry(AttemptOutcome::Frozen));
        }

        self.lease_client.consume(lease).await?;

        #[cfg(feature = "tracing")]
        info!(phone_number = %lease.phone_number(), "Account finalized");

        Ok(AttemptEnd::Finalized)
    }

    /// Classify the post-submission screen, degrading classifier
    /// failures to a rejection verdict.
    async fn classify(&self, device_id: &DeviceId) -> SubmissionOutcome {
        match self.classifier.classify_submission(device_id).await {
            Ok(classification) => {
                #[cfg(feature = "tracing")]
                debug!(
                    raw_label = %classification.raw_label,
                    outcome = %classification.outcome,
                    "Submission classified"
                );
                classification.outcome
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                warn!(error = %_e, "Classification failed, treating as rejected");
                SubmissionOutcome::Rejected
            }
        }
    }

    /// Strip the country dial code off the leased number. `None` when
    /// the country has no dial-code entry or the number does not carry
    /// it, which makes the lease unusable on-device.
    fn national_number(&self, lease: &PhoneLease) -> Option<Number> {
        let dial_code = dial_code_for(lease.country())?;
        Number::from_full_number(lease.phone_number(), &dial_code).ok()
    }

    /// Best-effort identity rotation.
    async fn rotate_identity(&self) {
        if !self.config.rotate_identity {
            return;
        }
        let Some(rotator) = &self.rotator else {
            return;
        };
        if let Err(_e) = rotator.rotate(self.config.country).await {
            #[cfg(feature = "tracing")]
            warn!(error = %_e, "Identity rotation failed, continuing anyway");
        }
    }

    async fn pace(&self) {
        let delay = self.pace_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    #[cfg(feature = "random")]
    fn pace_delay(&self) -> Duration {
        use rand::Rng;

        let min = self.config.pace_min.min(self.config.pace_max);
        let max = self.config.pace_max.max(self.config.pace_min);
        if min == max {
            return min;
        }
        let millis = rand::thread_rng().gen_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(millis)
    }

    #[cfg(not(feature = "random"))]
    fn pace_delay(&self) -> Duration {
        self.config.pace_min
    }
}
