use css_inline::InlineError;
use thiserror::Error;
use tracing::debug;

use crate::domain::{communication::mailer::MailerError, verification::StoreError};

/// Errors that can occur when sending a notification or checking a reset code
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The verification store failed; for a reset request nothing was sent
    #[error("verification store failed")]
    StorageError(#[source] StoreError),

    /// The email body could not be rendered
    #[error("could not render email")]
    CouldNotRenderEmail,

    /// The transport failed and the message only reached the fallback log
    #[error("could not send email")]
    CouldNotSendEmail(#[source] MailerError),
}

impl From<StoreError> for NotificationError {
    fn from(err: StoreError) -> Self {
        debug!("StoreError -> NotificationError");

        NotificationError::StorageError(err)
    }
}

impl From<MailerError> for NotificationError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> NotificationError");

        NotificationError::CouldNotSendEmail(err)
    }
}

impl From<InlineError> for NotificationError {
    fn from(_err: InlineError) -> Self {
        debug!("InlineError -> NotificationError");

        NotificationError::CouldNotRenderEmail
    }
}

impl From<askama::Error> for NotificationError {
    fn from(_err: askama::Error) -> Self {
        debug!("askama::Error -> NotificationError");

        NotificationError::CouldNotRenderEmail
    }
}
