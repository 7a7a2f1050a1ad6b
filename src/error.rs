use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use common::ErrorResponse;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{error, warn};

use crate::repositories::RepositoryError;
use crate::security::SecurityError;
use crate::uploader::UploadError;

/// Error taxonomy of the API. The HTTP status is derived from the variant,
/// never from the message text.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input failed a shape or business rule; carries one detail per failure
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Credentials were rejected
    #[error("{0}")]
    Auth(String),

    /// No usable bearer token on a protected route
    #[error("unauthorized")]
    Unauthorized,

    /// Bearer token failed signature or expiry checks
    #[error("invalid token")]
    InvalidToken,

    /// Authenticated caller does not own the resource
    #[error("forbidden: you do not own this movie")]
    Forbidden,

    /// Resource does not exist; holds the resource name
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness constraint violated
    #[error("{0}")]
    Conflict(String),

    /// The image host refused or failed the upload
    #[error("failed to upload poster: {0}")]
    Upload(#[source] UploadError),

    /// Unexpected failure inside the service
    #[error("{0}")]
    Internal(String),

    /// Error from the database operations
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Type alias for Result with AppError
pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(vec![detail.into()])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) | Self::Unauthorized | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upload(_) | Self::Internal(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Detail strings placed in the envelope's `errors` list. Server-side
    /// failures are reported generically.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Validation(details) => details.clone(),
            Self::Unauthorized | Self::InvalidToken => vec!["unauthorized".to_string()],
            Self::Database(_) => vec!["internal server error".to_string()],
            Self::Upload(_) => vec!["failed to upload poster".to_string()],
            other => vec![other.to_string()],
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation failed",
            Self::Auth(_) => "Authentication failed",
            Self::Unauthorized => "Unauthorized",
            Self::InvalidToken => "Invalid token",
            Self::Forbidden => "Forbidden",
            Self::NotFound(_) => "Not found",
            Self::Conflict(_) => "Conflict",
            Self::Upload(_) | Self::Internal(_) | Self::Database(_) => "Internal server error",
        }
    }

    /// Attaches the endpoint-specific summary shown in the envelope.
    pub fn with_message(self, message: impl Into<String>) -> ApiError {
        ApiError {
            message: message.into(),
            error: self,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Conflict(detail) => Self::Conflict(detail),
            RepositoryError::Database(db_error) => Self::Database(db_error),
        }
    }
}

impl From<SecurityError> for AppError {
    fn from(error: SecurityError) -> Self {
        match error {
            SecurityError::InvalidToken => Self::InvalidToken,
            SecurityError::Hash(_) | SecurityError::Task(_) => {
                Self::Internal("failed to hash password".to_string())
            }
            SecurityError::Signing(_) => Self::Internal("failed to generate token".to_string()),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(error: UploadError) -> Self {
        match error {
            local @ (UploadError::UnsupportedFormat(_) | UploadError::Empty) => {
                Self::validation(local.to_string())
            }
            other => Self::Upload(other),
        }
    }
}

/// An [`AppError`] paired with the summary message of the failing endpoint.
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub error: AppError,
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        let message = error.default_message();
        error.with_message(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = ?self.error, "{}", self.message);
        } else {
            warn!(status = status.as_u16(), error = %self.error, "{}", self.message);
        }

        let body = ErrorResponse::new(self.message, self.error.details());
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
