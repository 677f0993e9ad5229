//! Infrastructure: transports, configuration and the HTTP surface

pub mod config;
pub mod email;
pub mod http;
