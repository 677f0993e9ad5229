//! Mail transport implementations

mod console;
mod sendgrid;
mod smtp;

pub use console::ConsoleTransport;
pub use sendgrid::{SendGridConfig, SendGridTransport};
pub use smtp::{SMTPConfig, SMTPTransport};
