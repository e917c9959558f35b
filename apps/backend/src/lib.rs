pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use matching_core::{DataProvider, JsonDirProvider};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::sessions::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn DataProvider>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn DataProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Build the router with every route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Subject routes
        .route("/api/subjects", get(routes::subjects::list))
        .route(
            "/api/subjects/{subject}/flashcards",
            get(routes::subjects::flashcards),
        )
        // Test mode routes
        .route("/api/test-sessions", post(routes::test_sessions::start))
        .route(
            "/api/test-sessions/{id}",
            get(routes::test_sessions::get).delete(routes::test_sessions::delete),
        )
        .route(
            "/api/test-sessions/{id}/click",
            post(routes::test_sessions::click),
        )
        .route(
            "/api/test-sessions/{id}/reset",
            post(routes::test_sessions::reset),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Serving flashcard data from {}", config.data_dir.display());
    let provider = JsonDirProvider::new(config.data_dir.clone());
    let addr = config.bind_addr();
    let state = AppState::new(config, Arc::new(provider));

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
