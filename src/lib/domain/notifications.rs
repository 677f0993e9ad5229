//! Notification emails: welcome and password reset

mod errors;
mod service;
mod templates;

pub use errors::NotificationError;
pub use service::{NotificationService, NotificationServiceImpl, NotificationSettings};
pub use templates::{
    NotificationEmail, PasswordResetEmailTemplate, RecipientName, RenderedEmail,
    WelcomeEmailTemplate, DEFAULT_RECIPIENT_NAME,
};
