//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Dataset
        .route("/regions", get(handlers::list_regions))
        .route("/report", get(handlers::get_report))
        .route("/dataset/reload", post(handlers::reload_dataset))
        // Job management
        .route("/jobs/{job_id}", get(handlers::get_job_status))
        // Selection
        .route(
            "/selection",
            get(handlers::get_selection).put(handlers::replace_selection),
        )
        .route("/selection/toggle", post(handlers::toggle_selection))
        // Chart
        .route(
            "/view",
            get(handlers::get_view)
                .put(handlers::set_view)
                .post(handlers::compute_view),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
