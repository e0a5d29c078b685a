use crate::config::HEALTH_PATH;
use super::{
    handlers::{health, upload},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Room for boundaries, part headers and small extra fields around the file.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let upload_routes = Router::new()
        .route(
            &state.config.upload_path,
            post(upload::upload_image).fallback(upload::method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route(HEALTH_PATH, get(health::health_check))
        .merge(upload_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
