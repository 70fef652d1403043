//! Evaluation normalization: raw engine scores to a White-relative scale.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::stockfish::EvalResult;

/// Saturation value for forced-mate scores, in pawns. Keeps graphs bounded;
/// exact mate distances live in a separate field for exact comparisons.
pub const MATE_SCORE_PAWNS: f64 = 100.0;

/// Exact forced-mate distance, White-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MateDistance {
    pub white_wins: bool,
    /// Moves until mate (0 = the position is already checkmate)
    pub moves: u32,
}

impl MateDistance {
    pub fn favors(&self, color: Color) -> bool {
        self.white_wins == (color == Color::White)
    }
}

/// A position score on a single comparable scale, relative to White.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScore {
    /// Evaluation in pawns, saturated to ±`MATE_SCORE_PAWNS` on forced mate
    pub pawns: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mate: Option<MateDistance>,
    /// Probability that White wins, in [0, 1]
    pub win_prob: f64,
}

/// Convert a raw engine score (relative to the side to move, UCI convention)
/// into a White-relative NormalizedScore. Pure, and antisymmetric under a
/// side-to-move flip: the same raw magnitude seen from the other side yields
/// the negated score.
pub fn normalize(raw: &EvalResult, side_to_move: Color) -> NormalizedScore {
    if let Some(m) = raw.mate {
        // `mate 0` means the mover is already checkmated
        let mover_wins = m > 0;
        let white_wins = mover_wins == (side_to_move == Color::White);
        NormalizedScore {
            pawns: if white_wins {
                MATE_SCORE_PAWNS
            } else {
                -MATE_SCORE_PAWNS
            },
            mate: Some(MateDistance {
                white_wins,
                moves: m.unsigned_abs(),
            }),
            // Forced mate overrides the logistic curve exactly
            win_prob: if white_wins { 1.0 } else { 0.0 },
        }
    } else {
        let cp = raw.cp.unwrap_or(0);
        let white_cp = f64::from(if side_to_move == Color::White { cp } else { -cp });
        NormalizedScore {
            pawns: white_cp / 100.0,
            mate: None,
            win_prob: win_probability(white_cp),
        }
    }
}

/// Logistic mapping from a White-relative centipawn advantage to a
/// White-win probability.
fn win_probability(white_cp: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-white_cp / 400.0))
}
