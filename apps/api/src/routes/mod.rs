pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/interviews", post(handlers::handle_create_interview))
        .route("/api/v1/interviews", get(handlers::handle_list_interviews))
        .route("/api/v1/interviews/:id", get(handlers::handle_get_interview))
        .route(
            "/api/v1/interviews/:id",
            delete(handlers::handle_delete_interview),
        )
        // Runner
        .route(
            "/api/v1/interviews/:id/runner",
            post(handlers::handle_start_runner).get(handlers::handle_runner_status),
        )
        .route(
            "/api/v1/interviews/:id/runner/webcam",
            post(handlers::handle_enable_webcam),
        )
        .route(
            "/api/v1/interviews/:id/runner/record",
            post(handlers::handle_start_recording),
        )
        .route(
            "/api/v1/interviews/:id/runner/stop",
            post(handlers::handle_stop_recording),
        )
        .route(
            "/api/v1/interviews/:id/runner/navigate",
            post(handlers::handle_navigate),
        )
        .route(
            "/api/v1/interviews/:id/runner/end",
            post(handlers::handle_end_interview),
        )
        // Review
        .route(
            "/api/v1/interviews/:id/review",
            get(handlers::handle_review),
        )
        .with_state(state)
}
