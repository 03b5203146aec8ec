use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lumen_core::AppError;
use serde_json::json;
use tracing::error;

/// JSON error response: `{"error": "..."}` with a 4xx/5xx status.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::DuplicateUser
            | AppError::UsernameTooLong(_)
            | AppError::InvalidCredentials
            | AppError::MissingParameter(_)
            | AppError::UnknownNode(_)
            | AppError::UnknownMode(_)
            | AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(err) => {
                error!(?err, "request failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
