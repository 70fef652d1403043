//! Game replay: SAN movetext to an ordered position sequence.

use shakmaty::{fen::Fen, san::SanPlus, CastlingMode, Chess, Color, EnPassantMode, Position};
use thiserror::Error;

use crate::game_data::GameRecord;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("ply {ply}: unparseable SAN token '{san}'")]
    BadSan { ply: usize, san: String },

    #[error("ply {ply}: illegal move '{san}' in position {fen}")]
    IllegalMove { ply: usize, san: String, fen: String },
}

/// One replayed ply: the move in both notations plus the positions around it.
#[derive(Debug, Clone)]
pub struct ReplayedMove {
    pub san: String,
    pub uci: String,
    pub fen_before: String,
    pub fen_after: String,
    pub mover: Color,
}

/// The full position sequence of a game: the start position plus one
/// position per ply (N+1 positions for N plies).
#[derive(Debug, Clone)]
pub struct Replay {
    pub start_fen: String,
    pub moves: Vec<ReplayedMove>,
}

impl Replay {
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }
}

fn fen_of(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Replay every SAN token of a game from the standard start position.
/// Fails on the first token that cannot be parsed or legally applied;
/// no partial replay is returned.
pub fn replay_game(record: &GameRecord) -> Result<Replay, ReplayError> {
    let mut pos = Chess::default();
    let start_fen = fen_of(&pos);
    let mut moves = Vec::with_capacity(record.moves.len());

    for (ply, token) in record.moves.iter().enumerate() {
        let fen_before = fen_of(&pos);
        let mover = pos.turn();

        let san: SanPlus = token.parse().map_err(|_| ReplayError::BadSan {
            ply,
            san: token.clone(),
        })?;

        let mv = san.san.to_move(&pos).map_err(|_| ReplayError::IllegalMove {
            ply,
            san: token.clone(),
            fen: fen_before.clone(),
        })?;

        let uci = mv.to_uci(CastlingMode::Standard).to_string();
        pos.play_unchecked(mv);

        moves.push(ReplayedMove {
            san: token.clone(),
            uci,
            fen_before,
            fen_after: fen_of(&pos),
            mover,
        });
    }

    Ok(Replay { start_fen, moves })
}
