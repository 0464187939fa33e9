//! Network identity rotation.

use std::error::Error as StdError;
use std::future::Future;

use isocountry::CountryCode;

/// Rotates the apparent network origin between attempts.
///
/// Rotation is an anti-correlation measure, not a correctness
/// requirement: the orchestrator calls it fire-and-forget, logs any
/// error it returns, and never retries or aborts on its account.
/// Production implementations switch a VPN endpoint to an exit in the
/// given country.
pub trait IdentityRotator: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Switch the network exit to the given country.
    fn rotate(
        &self,
        country: CountryCode,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Rotator that does nothing, for runs without VPN assistance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRotation;

impl IdentityRotator for NoRotation {
    type Error = std::convert::Infallible;

    async fn rotate(&self, _country: CountryCode) -> Result<(), Self::Error> {
        Ok(())
    }
}
