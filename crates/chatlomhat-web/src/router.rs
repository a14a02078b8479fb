//! Axum router: maps all URL paths to handlers.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    services::ServeDir,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    pages::{home, about},
    solver::{solver_submit, solver_remove_image},
    exercises::{exercises_submit, exercises_toggle},
    proxy::{solve_proxy, generate_exercises_proxy},
    health::api_health,
};

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",      get(home))
        .route("/about", get(about))

        // Form posts from the UI
        .route("/ui/solver",                    post(solver_submit))
        .route("/ui/solver/remove-image",       post(solver_remove_image))
        .route("/ui/exercises",                 post(exercises_submit))
        .route("/ui/exercises/{index}/toggle",  post(exercises_toggle))

        // Backend proxies
        .route("/solve",              post(solve_proxy))
        .route("/generate-exercises", post(generate_exercises_proxy))

        // API endpoints
        .route("/api/health", get(api_health))

        // Static files
        .nest_service("/static", ServeDir::new(STATIC_DIR))

        // Middleware
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
