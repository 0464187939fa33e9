//! Remote SMS leasing service adapters.

pub(crate) mod retryable;
pub(crate) mod traits;

#[cfg(feature = "sms-activate")]
pub mod sms_activate;

pub use retryable::RetryableProvider;
pub use traits::Provider;
