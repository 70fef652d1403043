//! Core game analysis: replay the game, walk the engine through every
//! position, classify every move, and aggregate per-player accuracy.

use chess_core::game_data::GameRecord;
use chess_core::replay::replay_game;
use serde::{Deserialize, Serialize};
use shakmaty::Color;
use tracing::info;

use crate::accuracy::{move_accuracy, AccuracyTracker};
use crate::classify::{classify, Label};
use crate::error::AnalysisError;
use crate::eval::{normalize, NormalizedScore};
use crate::stockfish::Evaluate;

/// One analyzed ply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveAnalysis {
    /// Full-move number (increments after Black's ply)
    pub move_number: u32,
    #[serde(rename = "move")]
    pub san: String,
    pub fen_before: String,
    pub fen_after: String,
    pub eval_before: NormalizedScore,
    pub eval_after: NormalizedScore,
    pub classification: Label,
    /// Engine suggestion for the position the mover faced, in UCI, when it
    /// differed from the move played
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_move: Option<String>,
    /// Accuracy of this move, 0-100
    pub accuracy: f64,
}

/// Full analysis of one game: one entry per played ply, plus per-player
/// aggregate accuracy. `moves[i].fen_before` always equals the previous
/// entry's `fen_after` (the start position for the first entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAnalysis {
    pub white_player: String,
    pub black_player: String,
    pub result: String,
    pub moves: Vec<MoveAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black_accuracy: Option<f64>,
}

/// Reduced per-move shape kept for older consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSummary {
    #[serde(rename = "move")]
    pub san: String,
    /// White-relative evaluation after the move, in pawns
    pub eval: f64,
    /// White-relative evaluation swing of the move, in pawns
    pub delta: f64,
    pub label: Label,
}

/// Analyze a game with the given evaluator. Evaluations are issued strictly
/// sequentially (one engine process can only run one search); each ply
/// reuses the previous position's evaluation as its "before" score, so a
/// game of N plies costs exactly N+1 engine round trips. Any error aborts
/// the run; no partial move sequence is ever returned.
pub async fn analyze_game<E: Evaluate>(
    evaluator: &mut E,
    record: &GameRecord,
) -> Result<GameAnalysis, AnalysisError> {
    let replay = replay_game(record)?;
    info!(
        white = %record.white,
        black = %record.black,
        plies = replay.ply_count(),
        "Starting analysis"
    );

    let start_raw = evaluator.evaluate(&replay.start_fen).await?;
    let mut eval_before = normalize(&start_raw, Color::White);
    let mut suggestion = start_raw.best_move;

    let mut moves = Vec::with_capacity(replay.ply_count());
    let mut tracker = AccuracyTracker::default();
    let mut move_number = 1u32;

    for played in &replay.moves {
        let raw = evaluator.evaluate(&played.fen_after).await?;
        let eval_after = normalize(&raw, played.mover.other());

        let classification = classify(&eval_before, &eval_after, played.mover);
        let accuracy = move_accuracy(eval_before.win_prob, eval_after.win_prob, played.mover);
        tracker.record(played.mover, accuracy);

        let best_move = suggestion.take().filter(|uci| *uci != played.uci);

        moves.push(MoveAnalysis {
            move_number,
            san: played.san.clone(),
            fen_before: played.fen_before.clone(),
            fen_after: played.fen_after.clone(),
            eval_before,
            eval_after,
            classification: classification.label,
            best_move,
            accuracy,
        });

        if played.mover == Color::Black {
            move_number += 1;
        }
        eval_before = eval_after;
        suggestion = raw.best_move;
    }

    let (white_accuracy, black_accuracy) = tracker.finish();
    info!(white_accuracy, black_accuracy, "Analysis complete");

    Ok(GameAnalysis {
        white_player: record.white.clone(),
        black_player: record.black.clone(),
        result: record.result.clone(),
        moves,
        white_accuracy,
        black_accuracy,
    })
}

/// Project a full analysis down to the legacy `{move, eval, delta, label}`
/// list. Same normalizer/classifier output, fewer fields.
pub fn summarize(analysis: &GameAnalysis) -> Vec<MoveSummary> {
    analysis
        .moves
        .iter()
        .map(|m| MoveSummary {
            san: m.san.clone(),
            eval: m.eval_after.pawns,
            delta: m.eval_after.pawns - m.eval_before.pawns,
            label: m.classification,
        })
        .collect()
}
