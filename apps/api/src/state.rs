use std::sync::Arc;

use sqlx::PgPool;

use crate::extraction::Vocabulary;
use crate::matching::MatchEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Loaded once at startup; the engine holds the same instance.
    pub vocabulary: Arc<Vocabulary>,
    /// Strict scoring for applications, exploratory scoring for recommendations.
    pub engine: Arc<MatchEngine>,
}
