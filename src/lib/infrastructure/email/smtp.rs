//! SMTP transport implementation

use std::time::Duration;

use async_trait::async_trait;
use clap::{ArgAction, Parser};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        Error as SmtpError,
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::communication::mailer::{MailTransport, OutboundMessage, TransportError};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST")]
    pub host: Option<String>,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-user", env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Verify the TLS certificate
    #[clap(long = "smtp-verify-tls", env = "SMTP_VERIFY_TLS", default_value = "true", action = ArgAction::Set)]
    pub verify_tls: bool,

    /// Use STARTTLS (upgrade on connection) instead of implicit TLS
    #[clap(long = "smtp-starttls", env = "SMTP_STARTTLS", default_value = "true", action = ArgAction::Set)]
    pub starttls: bool,
}

/// SMTP transport
pub struct SMTPTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl std::fmt::Debug for SMTPTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SMTPTransport")
            .field("host", &self.host)
            .finish()
    }
}

impl SMTPTransport {
    /// Create a new SMTP transport from its configuration
    pub fn new(config: &SMTPConfig, timeout: Duration) -> Result<Self, TransportError> {
        let host = config
            .host
            .clone()
            .ok_or_else(|| TransportError::NotConfigured("SMTP_HOST is required".to_string()))?;

        let tls_parameters = TlsParameters::builder(host.clone())
            .dangerous_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| TransportError::NotConfigured(e.to_string()))?;

        let relay = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
        }
        .map_err(|e| TransportError::NotConfigured(e.to_string()))?;

        let tls = if config.starttls {
            Tls::Required(tls_parameters)
        } else {
            Tls::Wrapper(tls_parameters)
        };

        let mut builder = relay.port(config.port).tls(tls).timeout(Some(timeout));

        match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
            }
            (None, None) => {}
            _ => {
                return Err(TransportError::NotConfigured(
                    "SMTP_USER and SMTP_PASSWORD must be set together".to_string(),
                ))
            }
        }

        Ok(Self {
            transport: builder.build(),
            host,
        })
    }

    fn build_message(message: &OutboundMessage) -> Result<(Message, String), TransportError> {
        let from_address: Address = message
            .from
            .email
            .parse()
            .map_err(|e| TransportError::InvalidMessage(format!("invalid from address: {e}")))?;

        let to: Mailbox = message
            .to
            .as_str()
            .parse()
            .map_err(|e| TransportError::InvalidMessage(format!("invalid to address: {e}")))?;

        let message_id = format!("<{}@{}>", Uuid::now_v7(), from_address.domain());

        let email = Message::builder()
            .message_id(Some(message_id.clone()))
            .from(Mailbox::new(Some(message.from.name.clone()), from_address))
            .to(to)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.plain_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| TransportError::InvalidMessage(e.to_string()))?;

        Ok((email, message_id))
    }
}

fn classify(err: SmtpError) -> TransportError {
    let code = err.status().map(|code| code.to_string());

    match code.as_deref() {
        Some("530") | Some("534") | Some("535") => {
            TransportError::AuthenticationFailed(err.to_string())
        }
        _ if err.is_permanent() => TransportError::Rejected(err.to_string()),
        _ => TransportError::ConnectionError(err.to_string()),
    }
}

#[async_trait]
impl MailTransport for SMTPTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<Option<String>, TransportError> {
        let (email, message_id) = Self::build_message(message)?;

        self.transport.send(email).await.map_err(classify)?;

        debug!(host = %self.host, %message_id, "SMTP server accepted message");

        Ok(Some(message_id))
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
