use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-level failures, rendered as JSON bodies.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Invalid rating or movie ID")]
    InvalidRating,

    #[error("Failed to rate movie")]
    RateFailed,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidRating => StatusCode::BAD_REQUEST,
            AppError::RateFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Unauthorized(message) => json!({ "message": message }),
            AppError::InvalidRating | AppError::RateFailed => {
                json!({ "success": false, "message": self.to_string() })
            }
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Startup failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid path pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: &'static str },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
