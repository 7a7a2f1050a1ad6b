//! Bearer token extraction for protected routes.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{ApiError, AppError};
use crate::schemas::AppState;

/// The authenticated caller, taken from a valid `Authorization: Bearer` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Token part of a `Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        trace!("Authenticating request");
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| {
                AppError::Unauthorized.with_message("Missing or invalid Authorization header")
            })?;

        let claims = state
            .tokens
            .parse_jwt(token)
            .map_err(|e| AppError::from(e).with_message("Invalid token"))?;

        debug!(user_id = %claims.user_id, "Request authenticated");
        Ok(Self {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}
