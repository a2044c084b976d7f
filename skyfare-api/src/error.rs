use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use skyfare_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    Anyhow(anyhow::Error),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Core(err) => match &err {
                CoreError::Validation(_)
                | CoreError::AlreadyCancelled(_)
                | CoreError::InsufficientSeats { .. }
                | CoreError::InsufficientWalletBalance { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                CoreError::Unauthorized(_) => (StatusCode::FORBIDDEN, err.to_string()),
                CoreError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                CoreError::ConflictRetry(_) => (StatusCode::CONFLICT, err.to_string()),
                CoreError::Internal(msg) => {
                    tracing::error!("Internal Server Error: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error".to_string(),
                    )
                }
            },
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
