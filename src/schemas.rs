use common::{
    ApiResponse, CreateMovieRequest, ErrorResponse, LoginRequest, LoginResponse, MessageResponse,
    MovieDetailsResponse, MovieResponse, PaginatedResponse, SignupRequest, UpdateMovieRequest,
    UserSummary,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::security::JwtService;
use crate::usecases::{MovieUsecase, UserUsecase};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection, used directly only by the health check
    pub db: DatabaseConnection,
    pub users: Arc<UserUsecase>,
    pub movies: Arc<MovieUsecase>,
    /// Verifies bearer tokens on protected routes
    pub tokens: Arc<JwtService>,
    pub limits: HttpLimits,
}

/// Request limits applied by the router.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HttpLimits {
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Multipart body of `POST /movies`, for documentation only.
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieForm {
    pub title: String,
    pub description: String,
    /// Repeat the field (or use `genres[]`) once per genre
    pub genres: Vec<String>,
    /// Repeat the field (or use `actors[]`) once per actor
    pub actors: Vec<String>,
    pub trailer_url: String,
    /// jpg, jpeg or png image
    #[schema(value_type = String, format = Binary)]
    pub poster: Vec<u8>,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::signup,
        crate::handlers::users::login,
        crate::handlers::movies::get_movies,
        crate::handlers::movies::get_movie,
        crate::handlers::movies::create_movie,
        crate::handlers::movies::update_movie,
        crate::handlers::movies::delete_movie,
    ),
    components(
        schemas(
            ApiResponse<UserSummary>,
            ApiResponse<LoginResponse>,
            ApiResponse<MovieResponse>,
            ApiResponse<MovieDetailsResponse>,
            PaginatedResponse<MovieResponse>,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            SignupRequest,
            LoginRequest,
            LoginResponse,
            UserSummary,
            CreateMovieRequest,
            CreateMovieForm,
            UpdateMovieRequest,
            MovieResponse,
            MovieDetailsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup and login"),
        (name = "movies", description = "Movie catalog endpoints"),
    ),
    info(
        title = "Movieshelf API",
        description = "Movie catalog with user accounts, owned entries and hosted posters",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
