//! Domain modules

pub mod communication;
pub mod notifications;
pub mod verification;
