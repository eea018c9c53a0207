mod config;
mod db;
mod errors;
mod extraction;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::Vocabulary;
use crate::matching::jitter::{JitterSource, SeededJitter, ThreadRngJitter};
use crate::matching::MatchEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let vocabulary = Arc::new(load_vocabulary(&config)?);
    info!(
        "Vocabulary loaded: {} skills, {} institutions, {} metro areas",
        vocabulary.skills.len(),
        vocabulary.institutions.len(),
        vocabulary.location.metro_areas.len()
    );

    let jitter: Arc<dyn JitterSource> = match config.recommendation_seed {
        Some(seed) => {
            info!("Recommendation jitter seeded with {seed}");
            Arc::new(SeededJitter::new(seed))
        }
        None => Arc::new(ThreadRngJitter),
    };
    let engine = Arc::new(MatchEngine::new(
        vocabulary.clone(),
        jitter,
        config.recommendation_jitter_max,
    ));

    let state = AppState {
        db,
        vocabulary,
        engine,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// External file from `VOCABULARY_PATH` if set, otherwise the built-in vocabulary.
fn load_vocabulary(config: &Config) -> Result<Vocabulary> {
    match &config.vocabulary_path {
        Some(path) => {
            info!("Loading vocabulary from {}", path.display());
            Vocabulary::from_path(path)
                .with_context(|| format!("Invalid vocabulary file {}", path.display()))
        }
        None => Vocabulary::builtin().context("Built-in vocabulary is invalid"),
    }
}
