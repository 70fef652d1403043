use std::sync::Arc;

use axum::{extract::Path, extract::Query, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::clients::chess_com::ChessComClient;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct GamesQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// GET /api/games/{username}
pub async fn list_games(
    Extension(chess_com): Extension<Arc<ChessComClient>>,
    Path(username): Path<String>,
    Query(q): Query<GamesQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let games = chess_com
        .fetch_recent_games(&username)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to fetch games: {e}")))?;

    let limit = q.limit.unwrap_or(20).min(100);
    let offset = q.offset.unwrap_or(0);

    let game_list: Vec<JsonValue> = games
        .iter()
        .enumerate()
        .skip(offset)
        .take(limit)
        .map(|(index, game)| {
            json!({
                "index": index,
                "white": game.white,
                "black": game.black,
                "result": game.result,
                "time_class": game.time_class,
                "url": game.url,
            })
        })
        .collect();

    Ok(Json(json!({ "games": game_list })))
}
