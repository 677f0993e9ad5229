//! Console transport: the dev-mode sink and the fallback record of failed sends

use async_trait::async_trait;
use tracing::info;

use crate::domain::communication::mailer::{MailTransport, OutboundMessage, TransportError};

/// Writes messages to stdout and the log instead of sending them
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleTransport;

impl ConsoleTransport {
    /// Creates a new console transport
    pub fn new() -> Self {
        Self
    }

    fn banner(message: &OutboundMessage) -> String {
        let rule = "=".repeat(40);

        format!(
            "\n{rule}\n  EMAIL FOR: {to}\n  FROM: {from}\n  SUBJECT: {subject}\n{rule}\n{body}\n{rule}\n",
            to = message.to,
            from = message.from.mailbox(),
            subject = message.subject,
            body = message.plain_body.trim_end(),
        )
    }
}

#[async_trait]
impl MailTransport for ConsoleTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<Option<String>, TransportError> {
        println!("{}", Self::banner(message));

        info!(
            to = %message.to,
            from = %message.from.mailbox(),
            subject = %message.subject,
            plain = %message.plain_body,
            html = %message.html_body,
            "email logged to console"
        );

        Ok(None)
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
