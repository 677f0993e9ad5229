//! Notification configuration, built once at startup

use std::{sync::Arc, time::Duration};

use clap::{value_parser, ArgAction, Parser, ValueEnum};

use crate::{
    domain::{
        communication::{
            mailer::{DeliveryMode, MailDispatcher, MailTransport, Sender, TransportError},
            EmailAddress,
        },
        notifications::NotificationSettings,
    },
    infrastructure::email::{
        ConsoleTransport, SMTPConfig, SMTPTransport, SendGridConfig, SendGridTransport,
    },
};

/// Which provider delivers mail
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// SMTP relay
    Smtp,

    /// SendGrid mail API
    Sendgrid,

    /// Log only
    Console,
}

/// Notification configuration
#[derive(Clone, Debug, Parser)]
pub struct NotificationConfig {
    /// The sender email address
    #[clap(
        long,
        env = "MAIL_SENDER_EMAIL",
        default_value = "noreply@winaldrugshop.com",
        value_parser = EmailAddress::new
    )]
    pub sender_email: EmailAddress,

    /// The sender display name, also used as the shop name in emails
    #[clap(long, env = "MAIL_SENDER_NAME", default_value = "Winal Drug Shop")]
    pub sender_name: String,

    /// The transport used to deliver mail
    #[clap(long = "mail-transport", env = "MAIL_TRANSPORT", value_enum, default_value_t = TransportKind::Smtp)]
    pub transport: TransportKind,

    /// Seconds to wait for the transport before giving up on a send
    #[clap(
        long,
        env = "MAIL_SEND_TIMEOUT_SECS",
        default_value = "10",
        value_parser = value_parser!(u64).range(1..=120)
    )]
    pub send_timeout_secs: u64,

    /// Development mode: log emails instead of sending them
    #[clap(long, env = "NOTIFY_DEV_MODE", default_value = "false", action = ArgAction::Set)]
    pub dev_mode: bool,

    /// Test mode: same as development mode, for automated test runs
    #[clap(long, env = "NOTIFY_TEST_MODE", default_value = "false", action = ArgAction::Set)]
    pub test_mode: bool,

    /// Digits per verification code
    #[clap(
        long,
        env = "VERIFICATION_CODE_LENGTH",
        default_value = "6",
        value_parser = value_parser!(u8).range(1..=32)
    )]
    pub code_length: u8,

    /// Minutes a verification code stays valid
    #[clap(
        long,
        env = "VERIFICATION_CODE_TTL_MINUTES",
        default_value = "15",
        value_parser = value_parser!(i64).range(1..=1440)
    )]
    pub code_ttl_minutes: i64,

    /// SMTP settings
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// SendGrid settings
    #[clap(flatten)]
    pub sendgrid: SendGridConfig,
}

impl NotificationConfig {
    /// Dev and test mode both bypass the transport
    pub fn delivery_mode(&self) -> DeliveryMode {
        if self.dev_mode || self.test_mode {
            DeliveryMode::LogOnly
        } else {
            DeliveryMode::Live
        }
    }

    /// The configured sender
    pub fn sender(&self) -> Sender {
        Sender::new(self.sender_email.as_str(), &self.sender_name)
    }

    /// Timeout for a single send attempt
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Settings for the notification service
    pub fn settings(&self) -> NotificationSettings {
        NotificationSettings {
            app_name: self.sender_name.clone(),
            code_length: usize::from(self.code_length),
            code_ttl: chrono::Duration::minutes(self.code_ttl_minutes),
        }
    }

    /// Builds the primary transport. In dev/test mode no credentials are needed and
    /// the console transport stands in.
    pub fn transport(&self) -> Result<Arc<dyn MailTransport>, TransportError> {
        if self.delivery_mode() == DeliveryMode::LogOnly {
            return Ok(Arc::new(ConsoleTransport::new()));
        }

        Ok(match self.transport {
            TransportKind::Smtp => Arc::new(SMTPTransport::new(&self.smtp, self.send_timeout())?),
            TransportKind::Sendgrid => {
                Arc::new(SendGridTransport::new(&self.sendgrid, self.send_timeout())?)
            }
            TransportKind::Console => Arc::new(ConsoleTransport::new()),
        })
    }

    /// Builds the mail dispatcher with the console as fallback
    pub fn mailer(&self) -> Result<MailDispatcher, TransportError> {
        Ok(
            MailDispatcher::new(self.sender(), self.transport()?, Arc::new(ConsoleTransport::new()))
                .with_mode(self.delivery_mode())
                .with_timeout(self.send_timeout()),
        )
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    /// Pins both mode flags so exported `NOTIFY_*` variables cannot leak in
    const LIVE: [&str; 4] = ["--dev-mode", "false", "--test-mode", "false"];

    fn parse(args: &[&str]) -> Result<NotificationConfig, clap::Error> {
        NotificationConfig::try_parse_from(std::iter::once("server").chain(args.iter().copied()))
    }

    fn live(args: &[&str]) -> Result<NotificationConfig, clap::Error> {
        parse(&[&LIVE[..], args].concat())
    }

    fn default_value(id: &str) -> Option<String> {
        let command = NotificationConfig::command();
        let value = command
            .get_arguments()
            .find(|arg| arg.get_id() == id)?
            .get_default_values()
            .first()?
            .to_string_lossy()
            .into_owned();

        Some(value)
    }

    #[test]
    fn test_command_is_well_formed() {
        NotificationConfig::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            default_value("sender_email").as_deref(),
            Some("noreply@winaldrugshop.com")
        );
        assert_eq!(default_value("sender_name").as_deref(), Some("Winal Drug Shop"));
        assert_eq!(default_value("transport").as_deref(), Some("smtp"));
        assert_eq!(default_value("send_timeout_secs").as_deref(), Some("10"));
        assert_eq!(default_value("dev_mode").as_deref(), Some("false"));
        assert_eq!(default_value("test_mode").as_deref(), Some("false"));
        assert_eq!(default_value("code_length").as_deref(), Some("6"));
        assert_eq!(default_value("code_ttl_minutes").as_deref(), Some("15"));
    }

    #[test]
    fn test_settings() -> TestResult {
        let config = live(&[
            "--sender-name",
            "Winal Drug Shop",
            "--send-timeout-secs",
            "10",
            "--code-length",
            "6",
            "--code-ttl-minutes",
            "15",
        ])?;

        assert_eq!(config.send_timeout(), Duration::from_secs(10));

        let settings = config.settings();

        assert_eq!(settings.code_length, 6);
        assert_eq!(settings.code_ttl, chrono::Duration::minutes(15));
        assert_eq!(settings.app_name, "Winal Drug Shop");

        Ok(())
    }

    #[test]
    fn test_dev_and_test_mode_log_only() -> TestResult {
        assert_eq!(live(&[])?.delivery_mode(), DeliveryMode::Live);
        assert_eq!(
            parse(&["--dev-mode", "true", "--test-mode", "false"])?.delivery_mode(),
            DeliveryMode::LogOnly
        );
        assert_eq!(
            parse(&["--dev-mode", "false", "--test-mode", "true"])?.delivery_mode(),
            DeliveryMode::LogOnly
        );

        Ok(())
    }

    #[test]
    fn test_dev_mode_needs_no_credentials() -> TestResult {
        let config = parse(&[
            "--dev-mode",
            "true",
            "--mail-transport",
            "sendgrid",
            "--sendgrid-api-key",
            "",
        ])?;

        assert_eq!(config.transport()?.name(), "console");

        let mailer = config.mailer()?;

        assert_eq!(mailer.mode(), DeliveryMode::LogOnly);
        assert_eq!(mailer.transport_name(), "console");

        Ok(())
    }

    #[test]
    fn test_sendgrid_without_key_is_an_error() -> TestResult {
        let config = live(&["--mail-transport", "sendgrid", "--sendgrid-api-key", ""])?;

        assert!(matches!(
            config.transport(),
            Err(TransportError::NotConfigured(_))
        ));

        Ok(())
    }

    #[test]
    fn test_sendgrid_transport() -> TestResult {
        let config = live(&["--mail-transport", "sendgrid", "--sendgrid-api-key", "SG.key"])?;

        assert_eq!(config.transport()?.name(), "sendgrid");

        Ok(())
    }

    #[test]
    fn test_code_length_must_be_positive() {
        assert!(parse(&["--code-length", "0"]).is_err());
    }

    #[test]
    fn test_send_timeout_must_be_positive() -> TestResult {
        assert!(parse(&["--send-timeout-secs", "0"]).is_err());
        assert!(parse(&["--send-timeout-secs", "121"]).is_err());
        assert_eq!(
            parse(&["--send-timeout-secs", "1"])?.send_timeout(),
            Duration::from_secs(1)
        );

        Ok(())
    }

    #[test]
    fn test_sender_email_is_validated() {
        for bad in ["not an address", "noreply@localhost", ""] {
            assert!(parse(&["--sender-email", bad]).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn test_sender() -> TestResult {
        let config = parse(&[
            "--sender-email",
            " hello@shop.example ",
            "--sender-name",
            "Shop",
        ])?;

        assert_eq!(config.sender(), Sender::new("hello@shop.example", "Shop"));
        assert_eq!(config.settings().app_name, "Shop");

        Ok(())
    }
}
