use crate::handlers::{
    health::health_check,
    movies::{create_movie, delete_movie, get_movie, get_movies, update_movie},
    users::{login, signup},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, Response, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use common::ErrorResponse;
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::{error, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Converts a panic inside a handler into the generic 500 envelope.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!("Request handler panicked: {}", detail);

    let body = ErrorResponse::new(
        "Internal server error",
        vec!["internal server error".to_string()],
    );
    let json = serde_json::to_vec(&body).unwrap_or_default();

    let mut response = Response::new(Body::from(json));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}

async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Not found", vec!["route not found".to_string()])),
    )
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new(
            "Method not allowed",
            vec!["method not allowed on this route".to_string()],
        )),
    )
}

/// The timeout layer answers with a bare 408; give it the usual envelope.
async fn timeout_envelope(response: Response<Body>) -> Response<Body> {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    warn!("Request timed out");
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(ErrorResponse::new(
            "Request timed out",
            vec!["request timed out".to_string()],
        )),
    )
        .into_response()
}

/// Routes of the API, without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth
        .route("/signup", post(signup))
        .route("/login", post(login))
        // Movie catalog
        .route("/movies", get(get_movies).post(create_movie))
        .route(
            "/movies/:id",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    with_middleware(api_routes(), state)
}

/// Adds API docs, envelope fallbacks, the body limit and the middleware
/// stack to `routes`.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let limits = state.limits;

    routes
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(limits.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(CompressionLayer::new())
                .layer(map_response(timeout_envelope))
                .layer(TimeoutLayer::new(limits.request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
