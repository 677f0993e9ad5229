//! Verification store errors

use thiserror::Error;

/// Errors raised by a [`VerificationStore`](super::VerificationStore)
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage cannot be used
    #[error("verification store unavailable: {0}")]
    Unavailable(String),
}
