use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use tracing::{error, warn};

use bazaar_core::{StoreError, TokenError};

use super::response::ApiResponse;
use crate::users::requests::ValidationError;

pub type AppResult<T> = Result<T, AppError>;

pub const WRONG_DATA_FORMAT: &str = "Wrong data format";
pub const VALIDATION_FAILED: &str = "Data validation failed";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Failure of a request, already reduced to what the client will see.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Body could not be parsed; the cause is only logged.
    pub fn bind(cause: impl fmt::Display) -> Self {
        warn!(%cause, "request body rejected");
        Self::new(StatusCode::BAD_REQUEST, WRONG_DATA_FORMAT)
    }

    /// Body parsed but broke a field rule; the cause is only logged.
    pub fn validation(cause: impl fmt::Display) -> Self {
        warn!(%cause, "request body failed validation");
        Self::new(StatusCode::BAD_REQUEST, VALIDATION_FAILED)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn panic() -> Self {
        Self::server(INTERNAL_SERVER_ERROR)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::error(self.message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bind(rejection.body_text())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err)
    }
}

// Store failures surface verbatim.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "store operation failed");
        Self::server(err.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing => {
                error!(error = %err, "failed to sign access token");
                Self::server(err.to_string())
            }
            other => Self::unauthorized(other.to_string()),
        }
    }
}
