use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::envelope::ApiResponse;
use crate::models::FieldViolation;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input")]
    Validation(Vec<FieldViolation>),

    #[error("Database configuration missing")]
    Configuration,

    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_api_response(self) -> ApiResponse {
        let status = self.status();
        let body = match &self {
            AppError::Validation(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            AppError::Configuration => json!({ "error": self.to_string() }),
            AppError::Database(e) => {
                error!("database error: {}", e);
                json!({ "error": e.to_string() })
            }
        };

        ApiResponse::json(status, &body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_api_response().into_response()
    }
}
