//! Mail dispatch: the [`Mailer`] contract and the transports behind it

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::EmailAddress;

mod dispatcher;
mod errors;
mod message;
mod transport;

pub use dispatcher::{DeliveryMode, MailDispatcher, DEFAULT_SEND_TIMEOUT};
pub use errors::{MailerError, TransportError};
pub use message::{Delivery, OutboundMessage, Sender};
pub use transport::MailTransport;

/// Email service
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `to` - The [`EmailAddress`] to send the email to.
    /// * `subject` - The subject of the email.
    /// * `html` - The HTML version of the email.
    /// * `plain` - The plain text version of the email.
    ///
    /// # Returns
    /// - [`Ok`] with the [`Delivery`] outcome, either sent or only logged.
    /// - [`Err`] with a [`MailerError`] once the console fallback has recorded the message.
    async fn send_email(
        &self,
        to: &EmailAddress,
        subject: &str,
        html: &str,
        plain: &str,
    ) -> Result<Delivery, MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, to: &EmailAddress, subject: &str, html: &str, plain: &str) -> Result<Delivery, MailerError>;
    }
}
