//! HTTP route modules and the application router.

pub mod admin;
pub mod api;
pub mod site;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Largest accepted request body (image uploads).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Admin mutations in flight at once.
pub const ADMIN_CONCURRENCY: usize = 4;

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    // Only the read API is meant for other origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    let images = ServeDir::new(state.assets_dir.join("images"));

    Router::new()
        .merge(site::router())
        .merge(admin::router())
        .nest("/api", api::router().layer(cors))
        .nest_service("/images", images)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}
