use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use analysis_engine::{AnalysisPool, EngineConfig};
use server::clients::chess_com::ChessComClient;
use server::config::Config;
use server::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    let engine_config = EngineConfig::from_env();
    tracing::info!(
        engine_path = %engine_config.engine_path,
        depth = engine_config.search_depth,
        movetime_ms = engine_config.movetime_ms,
        workers = engine_config.max_concurrent,
        "Engine configuration loaded"
    );

    let pool = Arc::new(AnalysisPool::new(engine_config));
    let chess_com = Arc::new(ChessComClient::new());

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router — same paths as the original FastAPI service
    let app = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/api/games/{username}", get(routes::games::list_games))
        .route("/api/analyze", post(routes::analyze::analyze_game))
        .route("/api/analyze/pgn", post(routes::analyze::analyze_pgn))
        // Shared state
        .layer(Extension(pool))
        .layer(Extension(chess_com))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
