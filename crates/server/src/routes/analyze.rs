use std::sync::Arc;

use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use analysis_engine::AnalysisPool;
use chess_core::pgn;

use crate::clients::chess_com::ChessComClient;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub username: String,
    #[serde(default)]
    pub game_index: usize,
}

#[derive(Deserialize)]
pub struct AnalyzePgnRequest {
    pub pgn: String,
}

/// POST /api/analyze
pub async fn analyze_game(
    Extension(pool): Extension<Arc<AnalysisPool>>,
    Extension(chess_com): Extension<Arc<ChessComClient>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<JsonValue>, AppError> {
    let games = chess_com
        .fetch_recent_games(&req.username)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to fetch games: {e}")))?;

    let game = games
        .get(req.game_index)
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

    let record = pgn::parse_pgn(&game.pgn)
        .ok_or_else(|| AppError::BadRequest("Game has no usable PGN data".to_string()))?;

    let analysis = pool.analyze(&record).await?;

    let mut body =
        serde_json::to_value(&analysis).map_err(|e| AppError::Internal(e.to_string()))?;
    body["username"] = json!(req.username);
    body["pgn"] = json!(game.pgn);

    Ok(Json(body))
}

/// POST /api/analyze/pgn — legacy shape: `{move, eval, delta, label}` only
pub async fn analyze_pgn(
    Extension(pool): Extension<Arc<AnalysisPool>>,
    Json(req): Json<AnalyzePgnRequest>,
) -> Result<Json<JsonValue>, AppError> {
    let moves = pool.analyze_pgn(&req.pgn).await?;
    Ok(Json(json!({ "moves": moves })))
}
