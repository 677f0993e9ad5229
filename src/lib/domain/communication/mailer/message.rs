//! Email message

use crate::domain::communication::EmailAddress;

/// The configured sender identity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    /// The from address
    pub email: String,

    /// The display name
    pub name: String,
}

impl Sender {
    /// Creates a new sender
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// `Name <address>` form used in From headers
    pub fn mailbox(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

/// A message ready for a transport. Built per send call and dropped afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// The recipient of the email
    pub to: EmailAddress,

    /// The sender of the email
    pub from: Sender,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html_body: String,

    /// The plain text body of the email
    pub plain_body: String,
}

/// How a successful dispatch was carried out
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to a transport
    Sent {
        /// Name of the transport that accepted the message
        transport: &'static str,

        /// Identifier assigned by the transport, if it returned one
        message_id: Option<String>,
    },

    /// Only logged, the transport was bypassed (dev/test mode)
    Logged,
}
