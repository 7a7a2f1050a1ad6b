pub mod health;
pub mod movies;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use common::validation_messages;
use tracing::debug;
use validator::Validate;

use crate::error::{ApiError, AppError};

/// Unwraps a JSON body and applies its `validator` rules, turning both kinds
/// of failure into 400 envelopes. Rule failures carry `rule_message`.
pub(crate) fn validated_json<T: Validate>(
    payload: Result<Json<T>, JsonRejection>,
    rule_message: &'static str,
) -> Result<T, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!("Rejected JSON body: {}", rejection.body_text());
        AppError::validation(rejection.body_text()).with_message("Invalid input")
    })?;
    validate(&body, rule_message)?;
    Ok(body)
}

pub(crate) fn validate<T: Validate>(body: &T, message: &'static str) -> Result<(), ApiError> {
    body.validate()
        .map_err(|errors| AppError::Validation(validation_messages(&errors)).with_message(message))
}
