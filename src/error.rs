//! Error types for the classification client

use thiserror::Error;

use crate::classify::ErrorClass;

/// Result type alias for the classification client
pub type Result<T> = std::result::Result<T, TitleError>;

/// Main error type for the classification client.
///
/// `Quota`, `RateLimited` and `Provider` carry the upstream message verbatim
/// so callers (and logs) can see what the external service actually said.
#[derive(Debug, Error)]
pub enum TitleError {
    /// Billing or quota exhaustion on the external account; never retried
    #[error("quota exhausted: {message}")]
    Quota { message: String },

    /// Transient throttling by the external service
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// Any other provider failure (network, timeout, malformed response)
    #[error("provider error: {message}")]
    Provider { message: String },

    /// Retry budget spent without a successful call
    #[error("retries exhausted after {attempts} attempts ({class:?}): {message}")]
    RetriesExhausted {
        attempts: usize,
        class: ErrorClass,
        message: String,
    },

    /// The provider answered, but with nothing usable as a title
    #[error("provider returned an empty completion")]
    EmptyCompletion,

    /// The caller's deadline passed while waiting on a timer
    #[error("cancelled: deadline elapsed during a suspended wait")]
    Cancelled,
}

impl TitleError {
    /// Wrap a single (non-retried) classified provider failure.
    pub fn from_classified(class: ErrorClass, message: String) -> Self {
        match class {
            ErrorClass::Quota => TitleError::Quota { message },
            ErrorClass::RateLimited => TitleError::RateLimited { message },
            ErrorClass::Other => TitleError::Provider { message },
        }
    }

    /// The error class this failure belongs to, for aggregate statistics.
    pub fn class(&self) -> ErrorClass {
        match self {
            TitleError::Quota { .. } => ErrorClass::Quota,
            TitleError::RateLimited { .. } => ErrorClass::RateLimited,
            TitleError::RetriesExhausted { class, .. } => *class,
            _ => ErrorClass::Other,
        }
    }
}
