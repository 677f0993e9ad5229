//! Welcome email handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
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

/// Welcome email request body
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct WelcomeEmailBody {
    /// The new user's email address
    #[schema(example = "email@example.com")]
    pub email: Option<String>,

    /// The new user's name
    #[schema(example = "Jo")]
    pub name: Option<String>,
}

/// Send a welcome email to a newly registered user
#[utoipa::path(
    post,
    operation_id = "send_welcome_email",
    tag = "Notifications",
    path = "/welcome-email",
    request_body = WelcomeEmailBody,
    responses(
        (status = StatusCode::OK, description = "Welcome email sent", body = MessageResponse),
        (status = StatusCode::BAD_REQUEST, description = "Missing or invalid input", body = ErrorResponse, example = json!({ "message": "Email and name are required" })),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Email could not be sent", body = ErrorResponse, example = json!({ "message": "Failed to send welcome email" })),
    )
)]
pub async fn handler<N: NotificationService>(
    State(state): State<AppState<N>>,
    request: Result<Json<WelcomeEmailBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = request?;

    let (Some(email), Some(name)) = (required(body.email), required(body.name)) else {
        return Err(ApiError::new_400("Email and name are required"));
    };

    let email = EmailAddress::new(&email)?;
    let name = RecipientName::new(Some(&name));

    state
        .notifications
        .send_welcome_email(&email, &name)
        .await
        .map_err(|err| {
            error!(%email, error = %err, "failed to send welcome email");

            ApiError::new_500("Failed to send welcome email")
        })?;

    Ok(Json(MessageResponse::new("Welcome email sent successfully")))
}
