//! Password reset email handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::{
    domain::{
        communication::EmailAddress,
        notifications::{NotificationService, RecipientName},
    },
    infrastructure::http::{
        errors::ApiError,
        handlers::{required, MessageResponse},
        state::AppState,
    },
};

/// Password reset request body
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PasswordResetBody {
    /// The account's email address
    #[schema(example = "email@example.com")]
    pub email: Option<String>,

    /// The name to greet the user with
    #[schema(example = "Jo")]
    pub name: Option<String>,

    /// Accepted for compatibility and logged; a fresh code is always issued
    #[schema(example = "123456")]
    pub verification_code: Option<String>,
}

/// Issue a password reset code and email it
#[utoipa::path(
    post,
    operation_id = "send_password_reset_email",
    tag = "Notifications",
    path = "/password-reset",
    request_body = PasswordResetBody,
    responses(
        (status = StatusCode::OK, description = "Password reset email sent", body = MessageResponse),
        (status = StatusCode::BAD_REQUEST, description = "Missing or invalid input", body = ErrorResponse, example = json!({ "message": "Email is required" })),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Code could not be stored or email could not be sent", body = ErrorResponse, example = json!({ "message": "Failed to send password reset email" })),
    )
)]
pub async fn handler<N: NotificationService>(
    State(state): State<AppState<N>>,
    request: Result<Json<PasswordResetBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = request?;

    let Some(email) = required(body.email) else {
        return Err(ApiError::new_400("Email is required"));
    };

    let email = EmailAddress::new(&email)?;
    let name = RecipientName::new(body.name.as_deref());

    if let Some(code) = body.verification_code.as_deref() {
        debug!(%email, code, "password reset request carried a verification code");
    }

    let expires_at = state
        .notifications
        .send_password_reset_email(&email, &name)
        .await
        .map_err(|err| {
            error!(%email, error = %err, "failed to send password reset email");

            ApiError::new_500("Failed to send password reset email")
        })?;

    debug!(%email, %expires_at, "password reset code issued");

    Ok(Json(MessageResponse::new(
        "Password reset email sent successfully",
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::{
            notifications::{tests::MockNotificationService, NotificationError},
            verification::StoreError,
        },
        infrastructure::http::{
            errors::ErrorResponse, handlers::MessageResponse, router, state::test_state,
        },
    };

    #[tokio::test]
    async fn test_send_password_reset_email_success() -> TestResult {
        let mut notifications = MockNotificationService::new();

        notifications
            .expect_send_password_reset_email()
            .withf(|email, name| email.as_str() == "a@b.com" && name.as_str() == "Jo")
            .times(1)
            .returning(|_, _| Ok(Utc::now() + Duration::minutes(15)));

        let response = TestServer::new(router(test_state(Some(notifications))))?
            .post("/password-reset")
            .json(&json!({ "email": "a@b.com", "name": "Jo", "verification_code": "999999" }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<MessageResponse>().message,
            "Password reset email sent successfully"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_password_reset_email_name_is_optional() -> TestResult {
        let mut notifications = MockNotificationService::new();

        notifications
            .expect_send_password_reset_email()
            .withf(|_, name| name.as_str() == "Valued Customer")
            .times(1)
            .returning(|_, _| Ok(Utc::now() + Duration::minutes(15)));

        let response = TestServer::new(router(test_state(Some(notifications))))?
            .post("/password-reset")
            .json(&json!({ "email": "a@b.com" }))
            .await;

        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn test_send_password_reset_email_requires_email() -> TestResult {
        let response = TestServer::new(router(test_state(None)))?
            .post("/password-reset")
            .json(&json!({ "name": "Jo" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorResponse>().message, "Email is required");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_password_reset_email_invalid_email() -> TestResult {
        let response = TestServer::new(router(test_state(None)))?
            .post("/password-reset")
            .json(&json!({ "email": "a@b" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorResponse>().message, "Invalid email format");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_password_reset_email_store_failure() -> TestResult {
        let mut notifications = MockNotificationService::new();

        notifications
            .expect_send_password_reset_email()
            .returning(|_, _| {
                Err(NotificationError::StorageError(StoreError::Unavailable(
                    "poisoned".to_string(),
                )))
            });

        let response = TestServer::new(router(test_state(Some(notifications))))?
            .post("/password-reset")
            .json(&json!({ "email": "a@b.com", "name": "Jo" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorResponse>().message,
            "Failed to send password reset email"
        );

        Ok(())
    }
}
