//! SMS lease client: lease lifecycle management with polling and timeouts.

pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod structure;
pub(crate) mod traits;

pub use config::{LeaseClientConfig, LeaseClientConfigBuilder};
pub use error::LeaseClientError;
pub use structure::{SmsLeaseClient, SmsLeaseClientBuilder};
pub use traits::SmsLeaseClientTrait;
