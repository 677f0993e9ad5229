//! Notification email templates

use std::fmt;

use askama::Template;
use chrono::{Datelike, Utc};

use super::NotificationError;

/// Salutation used when no usable name was given
pub const DEFAULT_RECIPIENT_NAME: &str = "Valued Customer";

/// The name used to greet a recipient
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientName(Option<String>);

impl RecipientName {
    /// Blank or whitespace-only names fall back to [`DEFAULT_RECIPIENT_NAME`]
    pub fn new(raw: Option<&str>) -> Self {
        Self(
            raw.map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        )
    }

    /// The name to print
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or(DEFAULT_RECIPIENT_NAME)
    }
}

impl fmt::Display for RecipientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A subject with its HTML and plain text bodies
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedEmail {
    /// The subject line
    pub subject: String,

    /// HTML body with styles inlined
    pub html: String,

    /// Plain text body
    pub plain: String,
}

/// An askama HTML template with a plain text twin
pub trait NotificationEmail: Template {
    /// The subject line
    fn subject(&self) -> String;

    /// Renders the plain text version of the email
    fn render_plain(&self) -> String;

    /// Renders the HTML (with CSS inlined) and plain text bodies
    fn render_email(&self) -> Result<RenderedEmail, NotificationError> {
        let html = css_inline::inline(&self.render()?)?;

        Ok(RenderedEmail {
            subject: self.subject(),
            html,
            plain: self.render_plain(),
        })
    }
}

/// Welcome email template
#[derive(Debug, Template)]
#[template(path = "emails/notifications/welcome.html")]
pub struct WelcomeEmailTemplate<'a> {
    /// Shop name shown in the header, subject and footer
    pub app_name: &'a str,

    /// Recipient's name, HTML-escaped on render
    pub name: &'a str,

    /// Copyright year
    pub year: i32,
}

impl<'a> WelcomeEmailTemplate<'a> {
    /// Creates a new `WelcomeEmailTemplate` dated with the current year
    pub fn new(app_name: &'a str, name: &'a RecipientName) -> Self {
        Self {
            app_name,
            name: name.as_str(),
            year: Utc::now().year(),
        }
    }
}

impl NotificationEmail for WelcomeEmailTemplate<'_> {
    fn subject(&self) -> String {
        format!("Welcome to {}!", self.app_name)
    }

    fn render_plain(&self) -> String {
        format!(
            "Welcome to {app}!\n\
             \n\
             Dear {name},\n\
             \n\
             Thank you for registering with {app}! Your account has been successfully created.\n\
             \n\
             With your new account, you can:\n\
             - Browse our range of products\n\
             - Book appointments and consultations\n\
             - Track your orders and history\n\
             \n\
             If you have any questions or need assistance, please don't hesitate to contact us.\n\
             \n\
             Best regards,\n\
             The {app} Team\n\
             \n\
             (c) {year} {app}. All rights reserved.\n",
            app = self.app_name,
            name = self.name,
            year = self.year,
        )
    }
}

/// Password reset email template
#[derive(Debug, Template)]
#[template(path = "emails/notifications/password_reset.html")]
pub struct PasswordResetEmailTemplate<'a> {
    /// Shop name shown in the header, subject and footer
    pub app_name: &'a str,

    /// Recipient's name, HTML-escaped on render
    pub name: &'a str,

    /// The verification code, printed verbatim
    pub code: &'a str,

    /// Minutes until the code expires
    pub ttl_minutes: i64,

    /// Copyright year
    pub year: i32,
}

impl<'a> PasswordResetEmailTemplate<'a> {
    /// Creates a new `PasswordResetEmailTemplate` dated with the current year
    pub fn new(app_name: &'a str, name: &'a RecipientName, code: &'a str, ttl_minutes: i64) -> Self {
        Self {
            app_name,
            name: name.as_str(),
            code,
            ttl_minutes,
            year: Utc::now().year(),
        }
    }
}

impl NotificationEmail for PasswordResetEmailTemplate<'_> {
    fn subject(&self) -> String {
        format!("Password Reset - {}", self.app_name)
    }

    fn render_plain(&self) -> String {
        format!(
            "Password Reset - {app}\n\
             \n\
             Dear {name},\n\
             \n\
             You requested a password reset for your {app} account.\n\
             \n\
             Your verification code is: {code}\n\
             \n\
             This code will expire in {ttl} minutes.\n\
             \n\
             If you did not request a password reset, please ignore this email or contact our support team if you have concerns.\n\
             \n\
             (c) {year} {app}. All rights reserved.\n",
            app = self.app_name,
            name = self.name,
            code = self.code,
            ttl = self.ttl_minutes,
            year = self.year,
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_recipient_name_defaults_when_absent_or_blank() {
        assert_eq!(RecipientName::new(None).as_str(), "Valued Customer");
        assert_eq!(RecipientName::new(Some("")).as_str(), "Valued Customer");
        assert_eq!(RecipientName::new(Some("   ")).as_str(), "Valued Customer");
        assert_eq!(RecipientName::new(Some(" Jo ")).as_str(), "Jo");
    }

    #[test]
    fn test_welcome_email_contains_name() -> TestResult {
        for raw in ["Jo", "Kim", "Alexandria Ocasio Ab"] {
            let name = RecipientName::new(Some(raw));
            let email = WelcomeEmailTemplate::new("Test Shop", &name).render_email()?;

            assert_eq!(email.subject, "Welcome to Test Shop!");
            assert!(email.html.contains(raw));
            assert!(email.plain.contains(&format!("Dear {raw},")));
        }

        Ok(())
    }

    #[test]
    fn test_welcome_email_contains_generated_names() -> TestResult {
        let pool: Vec<char> = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ'&-.éüñØ名"
            .chars()
            .collect();
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let length = rng.gen_range(1..=20);
            let raw: String = (0..length)
                .map(|_| pool[rng.gen_range(0..pool.len())])
                .collect();

            let name = RecipientName::new(Some(&raw));
            let email = WelcomeEmailTemplate::new("Test Shop", &name).render_email()?;

            // only `&` stays escaped once styles are inlined
            let in_html = format!("Dear {},", raw.replace('&', "&amp;"));

            assert!(email.html.contains(&in_html), "{raw:?} missing from html");
            assert!(
                email.plain.contains(&format!("Dear {raw},")),
                "{raw:?} missing from plain text"
            );
        }

        Ok(())
    }

    #[test]
    fn test_welcome_email_apostrophe_ampersand_and_accents() -> TestResult {
        let name = RecipientName::new(Some("O'Brien & Søn"));
        let email = WelcomeEmailTemplate::new("Test Shop", &name).render_email()?;

        assert!(email.html.contains("Dear O'Brien &amp; Søn,"));
        assert!(email.plain.contains("Dear O'Brien & Søn,"));

        Ok(())
    }

    #[test]
    fn test_welcome_email_default_name() -> TestResult {
        let name = RecipientName::new(None);
        let email = WelcomeEmailTemplate::new("Test Shop", &name).render_email()?;

        assert!(email.html.contains("Dear Valued Customer,"));
        assert!(email.plain.contains("Dear Valued Customer,"));

        Ok(())
    }

    #[test]
    fn test_welcome_email_footer_has_current_year() -> TestResult {
        let name = RecipientName::new(Some("Kim"));
        let email = WelcomeEmailTemplate::new("Test Shop", &name).render_email()?;
        let year = Utc::now().year().to_string();

        assert!(email.html.contains(&year));
        assert!(email.plain.contains(&format!("(c) {year} Test Shop")));

        Ok(())
    }

    #[test]
    fn test_password_reset_email_contains_code_and_name() -> TestResult {
        let name = RecipientName::new(Some("Jo"));
        let email =
            PasswordResetEmailTemplate::new("Test Shop", &name, "042917", 15).render_email()?;

        assert_eq!(email.subject, "Password Reset - Test Shop");
        assert!(email.html.contains("042917"));
        assert!(email.html.contains("Jo"));
        assert!(email.html.contains("expire in 15 minutes"));
        assert!(email.plain.contains("Your verification code is: 042917"));
        assert!(email.plain.contains("Dear Jo,"));

        Ok(())
    }

    #[test]
    fn test_password_reset_email_highlights_code() -> TestResult {
        let name = RecipientName::new(None);
        let email =
            PasswordResetEmailTemplate::new("Test Shop", &name, "123456", 15).render_email()?;

        assert!(email.html.contains("<strong>123456</strong>"));
        assert!(email.html.contains("letter-spacing"));

        Ok(())
    }

    #[test]
    fn test_html_escapes_name() -> TestResult {
        let name = RecipientName::new(Some("<script>alert(1)</script>"));
        let email = WelcomeEmailTemplate::new("Test Shop", &name).render_email()?;

        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.plain.contains("<script>alert(1)</script>"));

        Ok(())
    }

    #[test]
    fn test_styles_are_inlined() -> TestResult {
        let name = RecipientName::new(Some("Kim"));
        let email = WelcomeEmailTemplate::new("Test Shop", &name).render_email()?;

        assert!(!email.html.contains("<style>"));
        assert!(email.html.contains("style=\""));

        Ok(())
    }
}
