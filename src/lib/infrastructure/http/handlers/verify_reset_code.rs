//! Verify password reset code handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::{
    domain::{communication::EmailAddress, notifications::NotificationService},
    infrastructure::http::{errors::ApiError, handlers::required, state::AppState},
};

/// Verify reset code request body
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct VerifyResetCodeBody {
    /// The account's email address
    #[schema(example = "email@example.com")]
    pub email: Option<String>,

    /// The code from the password reset email
    #[schema(example = "123456")]
    pub verification_code: Option<String>,

    /// Clear the code when it matches
    #[schema(example = false)]
    pub consume: Option<bool>,
}

/// Verify reset code response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResetCodeResponse {
    /// What happened
    #[schema(example = "Verification code is valid")]
    pub message: String,

    /// Whether the code matched an unexpired record
    pub valid: bool,
}

/// Check a password reset code
#[utoipa::path(
    post,
    operation_id = "verify_reset_code",
    tag = "Notifications",
    path = "/password-reset/verify",
    request_body = VerifyResetCodeBody,
    responses(
        (status = StatusCode::OK, description = "Code checked", body = VerifyResetCodeResponse),
        (status = StatusCode::BAD_REQUEST, description = "Missing or invalid input", body = ErrorResponse, example = json!({ "message": "Verification code is required" })),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Verification store failed", body = ErrorResponse, example = json!({ "message": "Failed to verify reset code" })),
    )
)]
pub async fn handler<N: NotificationService>(
    State(state): State<AppState<N>>,
    request: Result<Json<VerifyResetCodeBody>, JsonRejection>,
) -> Result<Json<VerifyResetCodeResponse>, ApiError> {
    let Json(body) = request?;

    let Some(email) = required(body.email) else {
        return Err(ApiError::new_400("Email is required"));
    };

    let Some(code) = required(body.verification_code) else {
        return Err(ApiError::new_400("Verification code is required"));
    };

    let email = EmailAddress::new(&email)?;
    let code = code.trim();

    let result = if body.consume.unwrap_or(false) {
        state.notifications.consume_reset_code(&email, code).await
    } else {
        state.notifications.verify_reset_code(&email, code).await
    };

    let valid = result.map_err(|err| {
        error!(%email, error = %err, "failed to verify reset code");

        ApiError::new_500("Failed to verify reset code")
    })?;

    let message = if valid {
        "Verification code is valid"
    } else {
        "Verification code is invalid or has expired"
    };

    Ok(Json(VerifyResetCodeResponse {
        message: message.to_string(),
        valid,
    }))
}
