//! Notification service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    communication::{
        mailer::{Delivery, Mailer},
        EmailAddress,
    },
    verification::{
        VerificationCode, VerificationStore, DEFAULT_CODE_LENGTH, DEFAULT_CODE_TTL_MINUTES,
    },
};

use super::{
    NotificationEmail, NotificationError, PasswordResetEmailTemplate, RecipientName,
    WelcomeEmailTemplate,
};

/// Settings the notification service is constructed with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Name shown in email subjects and bodies
    pub app_name: String,

    /// Digits per verification code
    pub code_length: usize,

    /// How long a verification code stays valid
    pub code_ttl: Duration,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            app_name: "Winal Drug Shop".to_string(),
            code_length: DEFAULT_CODE_LENGTH,
            code_ttl: Duration::minutes(DEFAULT_CODE_TTL_MINUTES),
        }
    }
}

/// Notification service
#[async_trait]
pub trait NotificationService: Clone + Send + Sync + 'static {
    /// Sends a welcome email to a newly registered user.
    ///
    /// # Arguments
    /// * `email` - The recipient.
    /// * `name` - The name to greet the recipient with.
    ///
    /// # Returns
    /// - [`Ok`] with the [`Delivery`] outcome.
    /// - [`Err`] with [`NotificationError::CouldNotSendEmail`] if the transport failed.
    async fn send_welcome_email(
        &self,
        email: &EmailAddress,
        name: &RecipientName,
    ) -> Result<Delivery, NotificationError>;

    /// Issues a password reset code and emails it.
    ///
    /// The code is stored before anything is sent; if storing fails nothing is sent.
    ///
    /// # Returns
    /// - [`Ok`] with the code's expiry time.
    /// - [`Err`] with a [`NotificationError`] if storing or sending failed.
    async fn send_password_reset_email(
        &self,
        email: &EmailAddress,
        name: &RecipientName,
    ) -> Result<DateTime<Utc>, NotificationError>;

    /// Checks a reset code without consuming it.
    async fn verify_reset_code(
        &self,
        email: &EmailAddress,
        code: &str,
    ) -> Result<bool, NotificationError>;

    /// Checks a reset code and clears it when it matches.
    async fn consume_reset_code(
        &self,
        email: &EmailAddress,
        code: &str,
    ) -> Result<bool, NotificationError>;
}

#[cfg(test)]
mock! {
    pub NotificationService {}

    impl Clone for NotificationService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl NotificationService for NotificationService {
        async fn send_welcome_email(&self, email: &EmailAddress, name: &RecipientName) -> Result<Delivery, NotificationError>;
        async fn send_password_reset_email(&self, email: &EmailAddress, name: &RecipientName) -> Result<DateTime<Utc>, NotificationError>;
        async fn verify_reset_code(&self, email: &EmailAddress, code: &str) -> Result<bool, NotificationError>;
        async fn consume_reset_code(&self, email: &EmailAddress, code: &str) -> Result<bool, NotificationError>;
    }
}

/// Notification service implementation
pub struct NotificationServiceImpl<S, M>
where
    S: VerificationStore,
    M: Mailer,
{
    store: Arc<S>,
    mailer: Arc<M>,
    settings: NotificationSettings,
}

impl<S, M> NotificationServiceImpl<S, M>
where
    S: VerificationStore,
    M: Mailer,
{
    /// Creates a new notification service.
    pub fn new(store: Arc<S>, mailer: Arc<M>, settings: NotificationSettings) -> Self {
        Self {
            store,
            mailer,
            settings,
        }
    }
}

impl<S, M> Clone for NotificationServiceImpl<S, M>
where
    S: VerificationStore,
    M: Mailer,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            mailer: self.mailer.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<S, M> fmt::Debug for NotificationServiceImpl<S, M>
where
    S: VerificationStore,
    M: Mailer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationServiceImpl")
            .field("store", &"VerificationStore")
            .field("mailer", &"Mailer")
            .field("settings", &self.settings)
            .finish()
    }
}

#[async_trait]
impl<S, M> NotificationService for NotificationServiceImpl<S, M>
where
    S: VerificationStore,
    M: Mailer,
{
    async fn send_welcome_email(
        &self,
        email: &EmailAddress,
        name: &RecipientName,
    ) -> Result<Delivery, NotificationError> {
        let content = WelcomeEmailTemplate::new(&self.settings.app_name, name).render_email()?;

        let delivery = self
            .mailer
            .send_email(email, &content.subject, &content.html, &content.plain)
            .await?;

        info!(to = %email, ?delivery, "welcome email dispatched");

        Ok(delivery)
    }

    async fn send_password_reset_email(
        &self,
        email: &EmailAddress,
        name: &RecipientName,
    ) -> Result<DateTime<Utc>, NotificationError> {
        let code = VerificationCode::generate(self.settings.code_length);

        let expires_at = self.store.put(email, &code, self.settings.code_ttl).await?;

        let content = PasswordResetEmailTemplate::new(
            &self.settings.app_name,
            name,
            code.as_str(),
            self.settings.code_ttl.num_minutes(),
        )
        .render_email()?;

        let delivery = self
            .mailer
            .send_email(email, &content.subject, &content.html, &content.plain)
            .await?;

        info!(to = %email, ?delivery, %expires_at, "password reset email dispatched");

        Ok(expires_at)
    }

    async fn verify_reset_code(
        &self,
        email: &EmailAddress,
        code: &str,
    ) -> Result<bool, NotificationError> {
        Ok(self.store.check(email, code).await?)
    }

    async fn consume_reset_code(
        &self,
        email: &EmailAddress,
        code: &str,
    ) -> Result<bool, NotificationError> {
        if !self.store.check(email, code).await? {
            return Ok(false);
        }

        self.store.clear(email).await?;
        debug!(email = %email, "reset code consumed");

        Ok(true)
    }
}
