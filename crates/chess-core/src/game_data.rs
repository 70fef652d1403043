use serde::{Deserialize, Serialize};

/// One game as retrieved from a games provider: players, declared result,
/// the SAN move list, and the raw PGN it came from. Immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub moves: Vec<String>, // SAN notation
    pub pgn: String,
}
