use chrono::{Datelike, Utc};
use reqwest::Client;
use serde_json::Value;

/// One game as listed by the Chess.com published-data API.
#[derive(Debug, Clone)]
pub struct FetchedGame {
    pub pgn: String,
    pub white: String,
    pub black: String,
    /// Result code of the white side ("win", "checkmated", ...)
    pub result: String,
    pub time_class: String,
    pub url: String,
}

pub struct ChessComClient {
    client: Client,
}

impl ChessComClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("ChessGameReview/1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        Self { client }
    }

    /// Fetch a user's recent games: the current month's archive, falling
    /// back to the previous month when it is empty.
    pub async fn fetch_recent_games(&self, username: &str) -> Result<Vec<FetchedGame>, String> {
        let now = Utc::now();
        let games = self.fetch_month(username, now.year(), now.month()).await?;
        if !games.is_empty() {
            return Ok(games);
        }

        let (prev_year, prev_month) = if now.month() > 1 {
            (now.year(), now.month() - 1)
        } else {
            (now.year() - 1, 12)
        };
        self.fetch_month(username, prev_year, prev_month).await
    }

    /// Fetch one monthly archive. A 404 (no archive) is an empty list.
    async fn fetch_month(
        &self,
        username: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<FetchedGame>, String> {
        let url = format!(
            "https://api.chess.com/pub/player/{}/games/{}/{:02}",
            username, year, month
        );

        // Rate limit
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Request error: {e}"))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(vec![]);
        }

        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| format!("JSON parse error: {e}"))?;

        let games = data["games"].as_array().cloned().unwrap_or_default();
        let mut results = Vec::new();

        for game in games {
            // Skip unrated games
            if !game.get("rated").and_then(|v| v.as_bool()).unwrap_or(true) {
                continue;
            }

            // Skip variant games
            let rules = game.get("rules").and_then(|v| v.as_str()).unwrap_or("chess");
            if rules != "chess" {
                continue;
            }

            let Some(pgn) = game.get("pgn").and_then(|v| v.as_str()) else {
                continue;
            };

            let player_name = |side: &str| {
                game.get(side)
                    .and_then(|p| p.get("username"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown")
                    .to_string()
            };

            results.push(FetchedGame {
                pgn: pgn.to_string(),
                white: player_name("white"),
                black: player_name("black"),
                result: game
                    .get("white")
                    .and_then(|p| p.get("result"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
                time_class: game
                    .get("time_class")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
                url: game
                    .get("url")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
            });
        }

        Ok(results)
    }
}

impl Default for ChessComClient {
    fn default() -> Self {
        Self::new()
    }
}
