//! Outbound communication: recipient addresses and mail dispatch

mod email_address;

pub mod mailer;

pub use email_address::{EmailAddress, EmailAddressError};
