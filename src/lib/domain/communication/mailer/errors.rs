//! Mailer errors

use std::time::Duration;

use thiserror::Error;

/// Failures reported by a [`MailTransport`](super::MailTransport)
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport is missing required configuration
    #[error("transport not configured: {0}")]
    NotConfigured(String),

    /// The provider rejected the credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider could not be reached
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// The provider refused the message
    #[error("message rejected: {0}")]
    Rejected(String),

    /// The message could not be built from its parts
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// No response within the send timeout
    #[error("send timed out after {0:?}")]
    Timeout(Duration),
}

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The transport failed; the message was written to the fallback log instead
    #[error("An error occurred while sending the email: {0}")]
    SendError(#[from] TransportError),
}
