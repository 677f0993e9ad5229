//! Mail dispatcher with console fallback

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::domain::communication::EmailAddress;

use super::{Delivery, MailTransport, Mailer, MailerError, OutboundMessage, Sender, TransportError};

/// Send timeout applied when none is configured
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Whether messages go out through the transport or are only logged
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Send through the configured transport
    #[default]
    Live,

    /// Log the message and report success without touching the transport
    LogOnly,
}

/// [`Mailer`] that builds the outbound message, makes a single attempt on the
/// primary transport and hands the message to the fallback sink when that fails.
#[derive(Clone)]
pub struct MailDispatcher {
    sender: Sender,
    transport: Arc<dyn MailTransport>,
    fallback: Arc<dyn MailTransport>,
    mode: DeliveryMode,
    timeout: Duration,
}

impl MailDispatcher {
    /// Creates a dispatcher in [`DeliveryMode::Live`] with the default timeout
    pub fn new(
        sender: Sender,
        transport: Arc<dyn MailTransport>,
        fallback: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            sender,
            transport,
            fallback,
            mode: DeliveryMode::Live,
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Sets the delivery mode
    pub fn with_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the timeout for a single transport attempt
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured sender
    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    /// Name of the primary transport
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// The delivery mode
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    async fn log_only(&self, message: &OutboundMessage) {
        if let Err(err) = self.fallback.send(message).await {
            error!(to = %message.to, error = %err, "could not log email");
        }
    }

    async fn fall_back(&self, message: &OutboundMessage, err: TransportError) -> MailerError {
        warn!(
            transport = self.transport.name(),
            to = %message.to,
            error = %err,
            "transport failed, falling back to console logging"
        );

        if let Err(fallback_err) = self.fallback.send(message).await {
            error!(
                transport = self.fallback.name(),
                error = %fallback_err,
                "fallback logging failed"
            );
        }

        MailerError::SendError(err)
    }
}

impl fmt::Debug for MailDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailDispatcher")
            .field("sender", &self.sender)
            .field("transport", &self.transport.name())
            .field("fallback", &self.fallback.name())
            .field("mode", &self.mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl Mailer for MailDispatcher {
    async fn send_email(
        &self,
        to: &EmailAddress,
        subject: &str,
        html: &str,
        plain: &str,
    ) -> Result<Delivery, MailerError> {
        let message = OutboundMessage {
            to: to.clone(),
            from: self.sender.clone(),
            subject: subject.to_string(),
            html_body: html.to_string(),
            plain_body: plain.to_string(),
        };

        if self.mode == DeliveryMode::LogOnly {
            self.log_only(&message).await;

            return Ok(Delivery::Logged);
        }

        match timeout(self.timeout, self.transport.send(&message)).await {
            Ok(Ok(message_id)) => {
                info!(
                    transport = self.transport.name(),
                    to = %message.to,
                    message_id = message_id.as_deref().unwrap_or("-"),
                    "email sent"
                );

                Ok(Delivery::Sent {
                    transport: self.transport.name(),
                    message_id,
                })
            }
            Ok(Err(err)) => Err(self.fall_back(&message, err).await),
            Err(_) => Err(self
                .fall_back(&message, TransportError::Timeout(self.timeout))
                .await),
        }
    }
}
