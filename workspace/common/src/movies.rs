use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Text fields of `POST /movies`. The body is multipart, so this struct is
/// assembled field by field by the handler; the poster travels separately as
/// a file part.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    #[validate(length(min = 1, max = 39, message = "must be between 1 and 39 characters"))]
    pub title: String,
    #[validate(length(min = 10, max = 999, message = "must be between 10 and 999 characters"))]
    pub description: String,
    #[validate(
        length(min = 1, message = "at least one genre is required"),
        custom(function = "crate::non_empty_items")
    )]
    pub genres: Vec<String>,
    #[validate(
        length(min = 1, message = "at least one actor is required"),
        custom(function = "crate::non_empty_items")
    )]
    pub actors: Vec<String>,
    /// YouTube link; the host rule is enforced by the movie use case
    #[validate(length(min = 1, message = "is required"))]
    pub trailer_url: String,
}

/// Request body for `PUT /movies/{id}`. Every mutable field is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    #[validate(length(min = 1, max = 39, message = "must be between 1 and 39 characters"))]
    pub title: String,
    #[validate(length(min = 10, max = 999, message = "must be between 10 and 999 characters"))]
    pub description: String,
    #[validate(
        length(min = 1, message = "at least one genre is required"),
        custom(function = "crate::non_empty_items")
    )]
    pub genres: Vec<String>,
    #[validate(
        length(min = 1, message = "at least one actor is required"),
        custom(function = "crate::non_empty_items")
    )]
    pub actors: Vec<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub trailer_url: String,
    /// Already hosted poster URL
    #[validate(url(message = "must be a valid URL"))]
    pub poster: String,
}

/// Query string of `GET /movies`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams, PartialEq)]
#[into_params(parameter_in = Query)]
pub struct MoviesQuery {
    /// 1-based page index (default 1)
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page, 1 to 100 (default 10)
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Case-insensitive substring filter on the title
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for MoviesQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            title: None,
        }
    }
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Movie as shown in listings and returned by create/update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub trailer_url: String,
    pub poster: String,
}

/// Movie detail view, including the owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailsResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub trailer_url: String,
    pub poster: String,
    pub user_id: Uuid,
}
