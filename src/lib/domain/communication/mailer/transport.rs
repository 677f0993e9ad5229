//! Transport capability

use async_trait::async_trait;

use super::{OutboundMessage, TransportError};

/// Something that can put an [`OutboundMessage`] on the wire (or the console)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Transmit the message, returning the provider's message id when there is one
    async fn send(&self, message: &OutboundMessage) -> Result<Option<String>, TransportError>;

    /// Short transport name used in logs
    fn name(&self) -> &'static str;
}
