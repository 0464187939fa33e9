//! Error classification traits shared across components.

/// Trait for errors that can be classified as retryable or permanent.
///
/// Two levels of classification are distinguished:
///
/// 1. **Call-level** (`is_retryable`): whether repeating the same call
///    (same lease, same parameters) might succeed. True for transient
///    failures such as network errors or temporary service outages.
///
/// 2. **Operation-level** (`should_retry_operation`): whether a fresh
///    pass (new lease, new device attempt) might succeed even though
///    this specific call is a lost cause.
///
/// The orchestrator branches on the operation level; the lease client's
/// internal retry branches on the call level.
///
/// # Examples
///
/// ```rust
/// use account_provisioner::RetryableError;
///
/// enum MyError {
///     NetworkTimeout,   // retry the same call
///     NumberRejected,   // fresh lease might work
///     InvalidApiKey,    // nothing will work until fixed
/// }
///
/// impl RetryableError for MyError {
///     fn is_retryable(&self) -> bool {
///         matches!(self, MyError::NetworkTimeout)
///     }
///
///     fn should_retry_operation(&self) -> bool {
///         match self {
///             MyError::NetworkTimeout => true,
///             MyError::NumberRejected => true,
///             MyError::InvalidApiKey => false,
///         }
///     }
/// }
/// ```
pub trait RetryableError {
    /// Returns true if this error is transient and the same call might
    /// succeed on retry.
    fn is_retryable(&self) -> bool;

    /// Returns true if a fresh operation (new lease / new attempt) might
    /// succeed.
    ///
    /// Default implementation returns the same as `is_retryable()`.
    fn should_retry_operation(&self) -> bool {
        self.is_retryable()
    }

    /// Returns true when the service explicitly reported that it has no
    /// numbers to lease for the requested country.
    ///
    /// The lease client fails acquisition immediately on these instead of
    /// spending its retry budget, and the orchestrator treats them as
    /// fatal for the whole run. Default implementation returns false.
    fn is_no_numbers(&self) -> bool {
        false
    }
}
