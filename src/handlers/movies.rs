use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use common::{
    ApiResponse, CreateMovieRequest, MessageResponse, MovieDetailsResponse,
    MovieResponse, MoviesQuery, PaginatedResponse, UpdateMovieRequest,
};
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;

use super::{validate, validated_json};
use crate::auth::AuthUser;
use crate::error::{ApiError, AppError};
use crate::schemas::AppState;
use crate::uploader::PosterFile;

fn movie_id(
    path: Result<Path<Uuid>, PathRejection>,
    message: &'static str,
) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        debug!("Rejected movie id: {}", rejection.body_text());
        AppError::validation("invalid movie id").with_message(message)
    })
}

fn form_error(error: MultipartError) -> ApiError {
    AppError::validation(error.body_text()).with_message("Invalid form data")
}

/// Collects the text fields and the poster file of a create form. List
/// fields may be repeated, with or without a `[]` suffix.
async fn read_movie_form(
    mut multipart: Multipart,
) -> Result<(CreateMovieRequest, Option<PosterFile>), ApiError> {
    let mut request = CreateMovieRequest::default();
    let mut poster = None;

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => request.title = field.text().await.map_err(form_error)?,
            "description" => request.description = field.text().await.map_err(form_error)?,
            "trailerUrl" => request.trailer_url = field.text().await.map_err(form_error)?,
            "genres" | "genres[]" => request.genres.push(field.text().await.map_err(form_error)?),
            "actors" | "actors[]" => request.actors.push(field.text().await.map_err(form_error)?),
            "poster" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(form_error)?;
                trace!("Received poster {} ({} bytes)", file_name, bytes.len());
                poster = Some(PosterFile::new(file_name, content_type, bytes.to_vec()));
            }
            other => debug!("Ignoring unknown form field {}", other),
        }
    }

    Ok((request, poster))
}

/// List movies, optionally filtered by title
#[utoipa::path(
    get,
    path = "/movies",
    tag = "movies",
    params(MoviesQuery),
    responses(
        (status = 200, description = "Movies fetched successfully", body = PaginatedResponse<MovieResponse>),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn get_movies(
    State(state): State<AppState>,
    query: Result<Query<MoviesQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<MovieResponse>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        AppError::validation(rejection.body_text()).with_message("Invalid pagination parameters")
    })?;
    debug!(page = query.page, page_size = query.page_size, title = ?query.title, "Listing movies");

    let page = state
        .movies
        .get_movies(query.page, query.page_size, query.title.as_deref())
        .await
        .map_err(|e| match e {
            AppError::Validation(_) => e.with_message("Invalid pagination parameters"),
            other => other.with_message("Failed to fetch movies"),
        })?;

    let items = page.items.into_iter().map(MovieResponse::from).collect();
    Ok(Json(PaginatedResponse::new(
        "Movies fetched successfully",
        items,
        query.page,
        query.page_size,
        page.total,
    )))
}

/// Get a movie with its owner id
#[utoipa::path(
    get,
    path = "/movies/{id}",
    tag = "movies",
    params(
        ("id" = Uuid, Path, description = "Movie id"),
    ),
    responses(
        (status = 200, description = "Movie details fetched successfully", body = ApiResponse<MovieDetailsResponse>),
        (status = 400, description = "Invalid movie id", body = ErrorResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn get_movie(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<MovieDetailsResponse>>, ApiError> {
    const FAILED: &str = "Failed to fetch movie details";
    let id = movie_id(id, FAILED)?;

    let movie = state
        .movies
        .get_movie_by_id(id)
        .await
        .map_err(|e| e.with_message(FAILED))?;

    Ok(Json(ApiResponse::success(
        "Movie details fetched successfully",
        MovieDetailsResponse::from(movie),
    )))
}

/// Create a movie owned by the caller
#[utoipa::path(
    post,
    path = "/movies",
    tag = "movies",
    request_body(content = CreateMovieForm, content_type = "multipart/form-data"),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Movie created successfully", body = ApiResponse<MovieResponse>),
        (status = 400, description = "Invalid form, validation or unsupported poster", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Poster upload failed", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(user_id = %caller.user_id))]
pub async fn create_movie(
    State(state): State<AppState>,
    caller: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<MovieResponse>>), ApiError> {
    let multipart = multipart.map_err(|rejection| {
        AppError::validation(rejection.body_text()).with_message("Invalid form data")
    })?;
    let (request, poster) = read_movie_form(multipart).await?;

    let poster = poster.ok_or_else(|| {
        AppError::validation("poster: is required").with_message("Poster is required")
    })?;
    validate(&request, "Validation failed")?;

    let movie = state
        .movies
        .create_movie(request, poster, caller.user_id)
        .await
        .map_err(|e| e.with_message("Failed to create movie"))?;

    info!(movie_id = %movie.id, "Movie created successfully");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Movie created successfully",
            MovieResponse::from(movie),
        )),
    ))
}

/// Replace a movie's details; only the owner may do this
#[utoipa::path(
    put,
    path = "/movies/{id}",
    tag = "movies",
    params(
        ("id" = Uuid, Path, description = "Movie id"),
    ),
    request_body = UpdateMovieRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Movie updated successfully", body = ApiResponse<MovieResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the movie", body = ErrorResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(user_id = %caller.user_id))]
pub async fn update_movie(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateMovieRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<MovieResponse>>, ApiError> {
    const FAILED: &str = "Failed to update movie";
    let id = movie_id(id, FAILED)?;
    let request = validated_json(payload, "Validation failed")?;

    let movie = state
        .movies
        .update_movie(id, request, caller.user_id)
        .await
        .map_err(|e| e.with_message(FAILED))?;

    info!(movie_id = %movie.id, "Movie updated successfully");
    Ok(Json(ApiResponse::success(
        "Movie updated successfully",
        MovieResponse::from(movie),
    )))
}

/// Delete a movie; only the owner may do this
#[utoipa::path(
    delete,
    path = "/movies/{id}",
    tag = "movies",
    params(
        ("id" = Uuid, Path, description = "Movie id"),
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Movie deleted successfully", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the movie", body = ErrorResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(user_id = %caller.user_id))]
pub async fn delete_movie(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    const FAILED: &str = "Failed to delete movie";
    let id = movie_id(id, FAILED)?;

    state
        .movies
        .delete_movie(id, caller.user_id)
        .await
        .map_err(|e| e.with_message(FAILED))?;

    info!(movie_id = %id, "Movie deleted successfully");
    Ok(Json(MessageResponse::success("Movie deleted successfully")))
}
