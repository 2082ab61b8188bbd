use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// `NoDataFound` and `InvalidModelOutput` are the two designed pipeline failures;
/// both are terminal and leave no artifacts behind.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No data found")]
    NoDataFound,

    #[error("Invalid model output: {0}")]
    InvalidModelOutput(String),

    #[error("Render failure: {0}")]
    Render(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code used in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NoDataFound => "NO_DATA_FOUND",
            AppError::InvalidModelOutput(_) => "INVALID_MODEL_OUTPUT",
            AppError::Render(_) => "RENDER_FAILURE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Io(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NoDataFound => (StatusCode::NOT_FOUND, "No data found".to_string()),
            AppError::InvalidModelOutput(detail) => {
                tracing::error!("Invalid model output: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "Invalid JSON from model".to_string(),
                )
            }
            AppError::Render(detail) => {
                tracing::error!("Render failure: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The persona image could not be rendered".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Io(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_found_maps_to_404() {
        let response = AppError::NoDataFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_model_output_maps_to_bad_gateway() {
        let response = AppError::InvalidModelOutput("expected object".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(AppError::NoDataFound.code(), "NO_DATA_FOUND");
        assert_eq!(
            AppError::InvalidModelOutput(String::new()).code(),
            "INVALID_MODEL_OUTPUT"
        );
        assert_eq!(AppError::Render(String::new()).code(), "RENDER_FAILURE");
    }
}
