//! Common transport-layer types for the movie catalog API.
//! Every endpoint answers with the same envelope; request bodies carry their
//! own shape rules through `validator` so handlers can reject bad input
//! before any business logic runs.

mod movies;
mod users;

pub use movies::{
    CreateMovieRequest, MovieDetailsResponse, MovieResponse, MoviesQuery, UpdateMovieRequest,
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use users::{LoginRequest, LoginResponse, SignupRequest, UserSummary};

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

/// Uniform response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Success flag
    pub success: bool,
    /// Human readable message
    pub message: String,
    /// Response payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<T>,
    /// Error details, empty on success
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, object: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            object: Some(object),
            errors: Vec::new(),
        }
    }
}

/// Envelope without a payload, used by endpoints that only confirm an action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Success flag
    pub success: bool,
    /// Human readable message
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Error envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false for errors
    pub success: bool,
    /// Human readable summary
    pub message: String,
    /// Error details
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
        }
    }
}

/// Envelope for paged listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub message: String,
    pub object: Vec<T>,
    /// 1-based page index that was returned
    pub page_number: u64,
    pub page_size: u64,
    /// Number of matching items across all pages
    pub total_size: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(
        message: impl Into<String>,
        object: Vec<T>,
        page_number: u64,
        page_size: u64,
        total_size: u64,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            object,
            page_number,
            page_size,
            total_size,
            errors: Vec::new(),
        }
    }
}

/// Flattens `validator` output into `field: message` detail strings,
/// sorted so responses are deterministic.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: failed '{}' check", error.code),
            })
        })
        .collect();
    messages.sort();
    messages
}

pub(crate) fn non_empty_items(items: &[String]) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(ValidationError::new("non_empty_items")
            .with_message(Cow::Borrowed("must not contain empty entries")));
    }
    Ok(())
}
