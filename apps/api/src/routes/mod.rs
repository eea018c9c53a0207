pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as cv;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV ingestion
        .route("/api/v1/students/:id/cv", post(cv::handle_upload_cv))
        .route("/api/v1/cv/preview", post(cv::handle_preview))
        // Matching
        .route(
            "/api/v1/students/:id/recommendations",
            get(matching::handle_recommendations),
        )
        .route("/api/v1/match/score", post(matching::handle_match_score))
        // Applications
        .route("/api/v1/applications", post(matching::handle_apply))
        .route(
            "/api/v1/jobs/:id/applications",
            get(matching::handle_job_applications),
        )
        .with_state(state)
}
