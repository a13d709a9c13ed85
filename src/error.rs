use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Domain errors mapped to HTTP responses. Every variant serializes as
/// `{"error": {"name", "message", "details"}}` with `details` null unless
/// the variant carries structured context.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {url} is not found!")]
    NotFound { method: String, url: String },

    #[error("{0} is not found!")]
    RecordNotFound(&'static str),

    #[error("{0} is not registered!")]
    EmailNotRegistered(String),

    #[error("{0} is already taken!")]
    EmailAlreadyTaken(String),

    #[error("Wrong password!")]
    WrongPassword,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Car is already rented for the requested dates!")]
    CarAlreadyRented,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn name(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NotFoundError",
            ApiError::RecordNotFound(_) => "RecordNotFoundError",
            ApiError::EmailNotRegistered(_) => "EmailNotRegisteredError",
            ApiError::EmailAlreadyTaken(_) => "EmailAlreadyTakenError",
            ApiError::WrongPassword => "WrongPasswordError",
            ApiError::Unauthorized(_) => "UnauthorizedError",
            ApiError::CarAlreadyRented => "CarAlreadyRentedError",
            ApiError::Validation(_) => "ValidationError",
            ApiError::Internal(_) => "InternalServerError",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } | ApiError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EmailNotRegistered(_) => StatusCode::NOT_FOUND,
            ApiError::EmailAlreadyTaken(_) | ApiError::CarAlreadyRented => StatusCode::CONFLICT,
            ApiError::WrongPassword | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::NotFound { method, url } => Some(json!({
                "method": method,
                "url": url,
            })),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    name: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                name: self.name(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        (status, Json(body)).into_response()
    }
}
