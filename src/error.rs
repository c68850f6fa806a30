//! Handler error type and its HTTP mapping.

use crate::api::ApiError;
use crate::checkout::submission::SubmissionError;
use crate::checkout::validation::ValidationErrors;
use crate::pricing::PricingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Message shown above a form with field errors.
pub const VALIDATION_MESSAGE: &str = "Please correct the highlighted fields.";

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more form fields are invalid.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    /// A single-field validation error.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": VALIDATION_MESSAGE, "errors": errors }),
            ),
            AppError::Pricing(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": e.to_string() }),
            ),
            AppError::Api(e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, json!({ "message": e.user_message() }))
            }
            AppError::Api(e @ ApiError::Remote { status, .. }) if (400..500).contains(status) => {
                let code = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST);
                (code, json!({ "message": e.user_message() }))
            }
            AppError::Api(e) => (StatusCode::BAD_GATEWAY, json!({ "message": e.user_message() })),
            AppError::Submission(e) => (StatusCode::CONFLICT, json!({ "message": e.to_string() })),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "message": message })),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}
