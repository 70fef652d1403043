//! Per-move accuracy from win-probability loss, plus per-player aggregates.

use shakmaty::Color;

/// Accuracy of one move on a 0-100 scale, from the White-relative win
/// probabilities before and after it.
pub fn move_accuracy(win_prob_before: f64, win_prob_after: f64, mover: Color) -> f64 {
    let (before, after) = match mover {
        Color::White => (win_prob_before, win_prob_after),
        Color::Black => (1.0 - win_prob_before, 1.0 - win_prob_after),
    };
    let win_percent_loss = (100.0 * (before - after)).max(0.0);
    (103.1668 * (-0.04354 * win_percent_loss).exp() - 3.1669).clamp(0.0, 100.0)
}

/// Running per-player averages. White plies feed White's aggregate only,
/// Black plies Black's.
#[derive(Debug, Default)]
pub struct AccuracyTracker {
    white_sum: f64,
    white_count: u32,
    black_sum: f64,
    black_count: u32,
}

impl AccuracyTracker {
    pub fn record(&mut self, mover: Color, accuracy: f64) {
        match mover {
            Color::White => {
                self.white_sum += accuracy;
                self.white_count += 1;
            }
            Color::Black => {
                self.black_sum += accuracy;
                self.black_count += 1;
            }
        }
    }

    /// Mean accuracy per player; None for a side that made no moves.
    pub fn finish(&self) -> (Option<f64>, Option<f64>) {
        let avg = |sum: f64, count: u32| (count > 0).then(|| sum / f64::from(count));
        (
            avg(self.white_sum, self.white_count),
            avg(self.black_sum, self.black_count),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_loss_is_near_perfect() {
        let acc = move_accuracy(0.55, 0.55, Color::White);
        assert!(acc > 99.0 && acc <= 100.0);
    }

    #[test]
    fn test_gain_caps_at_100() {
        assert_eq!(move_accuracy(0.50, 0.80, Color::White), 100.0);
    }

    #[test]
    fn test_total_collapse_floors_at_0() {
        assert_eq!(move_accuracy(1.0, 0.0, Color::White), 0.0);
    }

    #[test]
    fn test_black_perspective() {
        // White's win probability rising is a loss for Black
        let acc = move_accuracy(0.50, 0.75, Color::Black);
        assert!(acc < 50.0);
        // ...and no loss at all for White
        assert_eq!(move_accuracy(0.50, 0.75, Color::White), 100.0);
    }

    #[test]
    fn test_accuracy_in_range() {
        let mut p = 0.0;
        while p <= 1.0 {
            let mut q = 0.0;
            while q <= 1.0 {
                for color in [Color::White, Color::Black] {
                    let acc = move_accuracy(p, q, color);
                    assert!((0.0..=100.0).contains(&acc), "accuracy {acc} out of range");
                }
                q += 0.125;
            }
            p += 0.125;
        }
    }

    #[test]
    fn test_tracker_splits_by_color() {
        let mut tracker = AccuracyTracker::default();
        tracker.record(Color::White, 90.0);
        tracker.record(Color::Black, 50.0);
        tracker.record(Color::White, 70.0);
        let (white, black) = tracker.finish();
        assert_eq!(white, Some(80.0));
        assert_eq!(black, Some(50.0));
    }

    #[test]
    fn test_tracker_empty_side_is_none() {
        let mut tracker = AccuracyTracker::default();
        tracker.record(Color::White, 100.0);
        let (white, black) = tracker.finish();
        assert_eq!(white, Some(100.0));
        assert_eq!(black, None);
    }
}
