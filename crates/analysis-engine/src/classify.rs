//! Move classification against the ordered loss threshold table.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::eval::NormalizedScore;

/// Quality label for one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Best,
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

/// Ordered lookup table: lower bound in centipawns (inclusive) per label.
/// Data, not branches, so thresholds stay independently testable.
const LABEL_TABLE: &[(i32, Label)] = &[
    (0, Label::Best),
    (20, Label::Excellent),
    (50, Label::Good),
    (150, Label::Inaccuracy),
    (300, Label::Mistake),
    (600, Label::Blunder),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Label,
    /// Self-inflicted loss in centipawns (gains are never penalized)
    pub loss_cp: f64,
}

/// Label for a centipawn loss: lower bound inclusive, upper exclusive.
pub fn label_for_loss(loss_cp: f64) -> Label {
    let mut label = Label::Best;
    for &(bound, candidate) in LABEL_TABLE {
        if loss_cp >= f64::from(bound) {
            label = candidate;
        }
    }
    label
}

/// Classify one move from the scores before and after it. Both scores must
/// come from the normalizer (White-relative, consistent side conventions);
/// this function re-expresses them for the mover.
pub fn classify(
    before: &NormalizedScore,
    after: &NormalizedScore,
    mover: Color,
) -> Classification {
    let sign = if mover == Color::White { 1.0 } else { -1.0 };
    let delta = sign * (after.pawns - before.pawns);
    let loss_cp = (-delta).max(0.0) * 100.0;

    // A forced mate that slips away is the worst category no matter what
    // the saturated numeric loss says.
    let had_mate = before.mate.is_some_and(|m| m.favors(mover));
    let kept_mate = after.mate.is_some_and(|m| m.favors(mover));
    if had_mate && !kept_mate {
        return Classification {
            label: Label::Blunder,
            loss_cp,
        };
    }

    Classification {
        label: label_for_loss(loss_cp),
        loss_cp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MateDistance;

    fn score(pawns: f64) -> NormalizedScore {
        NormalizedScore {
            pawns,
            mate: None,
            win_prob: 0.5,
        }
    }

    fn mate_score(white_wins: bool, moves: u32) -> NormalizedScore {
        NormalizedScore {
            pawns: if white_wins { 100.0 } else { -100.0 },
            mate: Some(MateDistance { white_wins, moves }),
            win_prob: if white_wins { 1.0 } else { 0.0 },
        }
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(label_for_loss(0.0), Label::Best);
        assert_eq!(label_for_loss(19.0), Label::Best);
        assert_eq!(label_for_loss(20.0), Label::Excellent);
        assert_eq!(label_for_loss(49.0), Label::Excellent);
        assert_eq!(label_for_loss(50.0), Label::Good);
        assert_eq!(label_for_loss(149.0), Label::Good);
        assert_eq!(label_for_loss(150.0), Label::Inaccuracy);
        assert_eq!(label_for_loss(299.0), Label::Inaccuracy);
        assert_eq!(label_for_loss(300.0), Label::Mistake);
        assert_eq!(label_for_loss(599.0), Label::Mistake);
        assert_eq!(label_for_loss(600.0), Label::Blunder);
        assert_eq!(label_for_loss(5000.0), Label::Blunder);
    }

    #[test]
    fn test_gains_are_never_penalized() {
        let c = classify(&score(-1.0), &score(2.0), Color::White);
        assert_eq!(c.label, Label::Best);
        assert_eq!(c.loss_cp, 0.0);
    }

    #[test]
    fn test_loss_is_mover_relative() {
        // White drops 2.5 pawns
        let c = classify(&score(1.0), &score(-1.5), Color::White);
        assert_eq!(c.loss_cp, 250.0);
        assert_eq!(c.label, Label::Inaccuracy);

        // The same swing is a gain from Black's point of view
        let c = classify(&score(1.0), &score(-1.5), Color::Black);
        assert_eq!(c.loss_cp, 0.0);
        assert_eq!(c.label, Label::Best);
    }

    #[test]
    fn test_missed_mate_is_always_a_blunder() {
        // White had mate in 2; after the move the mate is gone but the
        // numeric swing alone would only be a Good move.
        let before = mate_score(true, 2);
        let mut after = score(99.0);
        after.win_prob = 0.99;
        let c = classify(&before, &after, Color::White);
        assert_eq!(c.label, Label::Blunder);
    }

    #[test]
    fn test_mate_reversal_is_a_blunder() {
        let c = classify(
            &mate_score(false, 4),
            &mate_score(true, 6),
            Color::Black,
        );
        assert_eq!(c.label, Label::Blunder);
    }

    #[test]
    fn test_keeping_the_mate_is_best() {
        // Mate in 3 converted to mate in 2: still winning, no loss
        let c = classify(&mate_score(true, 3), &mate_score(true, 2), Color::White);
        assert_eq!(c.label, Label::Best);
    }
}
