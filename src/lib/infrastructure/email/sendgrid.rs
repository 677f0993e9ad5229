//! SendGrid v3 mail API transport

use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::domain::communication::mailer::{MailTransport, OutboundMessage, TransportError};

/// SendGrid configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SendGridConfig {
    /// The SendGrid API key
    #[clap(long = "sendgrid-api-key", env = "SENDGRID_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the SendGrid API
    #[clap(
        long = "sendgrid-api-url",
        env = "SENDGRID_API_URL",
        default_value = "https://api.sendgrid.com"
    )]
    pub api_url: String,
}

#[derive(Debug, Serialize)]
struct SendGridAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SendGridPersonalization<'a> {
    to: Vec<SendGridAddress<'a>>,
}

#[derive(Debug, Serialize)]
struct SendGridContent<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct SendGridMailBody<'a> {
    personalizations: Vec<SendGridPersonalization<'a>>,
    from: SendGridAddress<'a>,
    subject: &'a str,
    content: Vec<SendGridContent<'a>>,
}

impl<'a> From<&'a OutboundMessage> for SendGridMailBody<'a> {
    fn from(message: &'a OutboundMessage) -> Self {
        Self {
            personalizations: vec![SendGridPersonalization {
                to: vec![SendGridAddress {
                    email: message.to.as_str(),
                    name: None,
                }],
            }],
            from: SendGridAddress {
                email: &message.from.email,
                name: Some(&message.from.name),
            },
            subject: &message.subject,
            // text/plain has to come first
            content: vec![
                SendGridContent {
                    content_type: "text/plain",
                    value: &message.plain_body,
                },
                SendGridContent {
                    content_type: "text/html",
                    value: &message.html_body,
                },
            ],
        }
    }
}

/// Transport that posts to the SendGrid mail send endpoint
#[derive(Debug, Clone)]
pub struct SendGridTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SendGridTransport {
    /// Create a new SendGrid transport
    pub fn new(config: &SendGridConfig, timeout: Duration) -> Result<Self, TransportError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                TransportError::NotConfigured("SENDGRID_API_KEY is required".to_string())
            })?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v3/mail/send", config.api_url.trim_end_matches('/')),
            api_key,
        })
    }
}

fn map_request_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::InvalidMessage(err.to_string())
    } else {
        TransportError::ConnectionError(err.to_string())
    }
}

#[async_trait]
impl MailTransport for SendGridTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<Option<String>, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SendGridMailBody::from(message))
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();

        if status.is_success() {
            let message_id = response
                .headers()
                .get("X-Message-Id")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            debug!(%status, ?message_id, "SendGrid accepted message");

            return Ok(message_id);
        }

        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                TransportError::AuthenticationFailed(format!("status={status}: {body}")),
            ),
            _ => Err(TransportError::Rejected(format!("status={status}: {body}"))),
        }
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}
