//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{
    errors::ErrorResponse,
    handlers::{password_reset, uptime, verify_reset_code, welcome_email, MessageResponse},
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Notification Service"),
    paths(
        welcome_email::handler,
        password_reset::handler,
        verify_reset_code::handler,
        uptime::handler
    ),
    components(schemas(
        welcome_email::WelcomeEmailBody,
        password_reset::PasswordResetBody,
        verify_reset_code::VerifyResetCodeBody,
        verify_reset_code::VerifyResetCodeResponse,
        uptime::UptimeResponse,
        MessageResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
