use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use common::{ApiResponse, LoginRequest, LoginResponse, SignupRequest, UserSummary};
use tracing::{info, instrument, trace};

use super::validated_json;
use crate::error::ApiError;
use crate::schemas::AppState;

/// Register a new user
#[utoipa::path(
    post,
    path = "/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Signup successful", body = ApiResponse<UserSummary>),
        (status = 400, description = "Invalid input, weak password or duplicate email/username", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserSummary>>), ApiError> {
    trace!("Entering signup handler");
    let request = validated_json(payload, "Invalid input")?;

    let user = state
        .users
        .signup(request)
        .await
        .map_err(|e| e.with_message("Signup failed"))?;

    info!(user_id = %user.id, "Signup successful");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Signup successful", UserSummary::from(user))),
    ))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    trace!("Entering login handler");
    let request = validated_json(payload, "Invalid input")?;

    let token = state
        .users
        .login(request)
        .await
        .map_err(|e| e.with_message("Login failed"))?;

    Ok(Json(ApiResponse::success("Login successful", LoginResponse { token })))
}
