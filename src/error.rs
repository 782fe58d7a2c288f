use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Only {available} seats available")]
    InsufficientSeats { available: i64 },

    #[error("{0}")]
    RateLimited(String),

    #[error("Invalid payment signature")]
    InvalidSignature,

    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    #[error("SMS delivery failed: {0}")]
    Sms(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InsufficientSeats { .. } => StatusCode::BAD_REQUEST,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidSignature => StatusCode::BAD_REQUEST,
            Self::PaymentGateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Sms(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Field-level messages for request validation failures.
    fn field_errors(&self) -> Option<HashMap<String, Vec<String>>> {
        let Self::InvalidInput(errors) = self else {
            return None;
        };

        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid {}", field))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Some(fields)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Something went wrong, please try again".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            success: false,
            message,
            errors: self.field_errors(),
        };

        (status, Json(body)).into_response()
    }
}

/// Maps a MySQL duplicate-key failure to a conflict with the given message.
pub fn conflict_on_duplicate(err: sqlx::Error, message: &str) -> AppError {
    let err_str = err.to_string();
    if err_str.contains("Duplicate entry") || err_str.contains("1062") {
        AppError::Conflict(message.to_string())
    } else {
        AppError::Database(err)
    }
}
