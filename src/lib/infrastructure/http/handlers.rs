//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::ErrorResponse;

pub mod password_reset;
pub mod uptime;
pub mod verify_reset_code;
pub mod welcome_email;

/// A plain success response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// What happened
    #[schema(example = "Welcome email sent successfully")]
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Treats absent, empty and whitespace-only fields alike
pub(crate) fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Catch panics and return a 500 error
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };

    tracing::error!(%details, "handler panicked");

    let response = Json(ErrorResponse { message: details }).into_response();

    (StatusCode::INTERNAL_SERVER_ERROR, response).into_response()
}
