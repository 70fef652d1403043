//! End-to-end analysis tests: full games through PGN parsing, replay, and
//! the analyzer, with a deterministic engine double standing in for the
//! subprocess client.

use analysis_engine::{analyze_game, summarize, AnalysisError, EvalResult, Evaluate, Label};
use chess_core::pgn::parse_pgn;

const SIX_PLY_PGN: &str = r#"[White "Player1"]
[Black "Player2"]
[Result "*"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 *"#;

/// Scholar's mate: White mates on move 4.
const SCHOLARS_MATE_PGN: &str = r#"[White "Attacker"]
[Black "Defender"]
[Result "1-0"]

1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0"#;

/// Deterministic evaluator: scores are a pure function of the FEN, so two
/// runs over the same game see identical evaluations. The returned cp is
/// relative to the side to move, like a real UCI engine's.
struct DeterministicEngine {
    calls: usize,
}

impl DeterministicEngine {
    fn new() -> Self {
        Self { calls: 0 }
    }

    fn score_for(fen: &str) -> i32 {
        let material: i32 = fen
            .split_whitespace()
            .next()
            .unwrap_or("")
            .chars()
            .map(|c| match c {
                'P' => 1,
                'N' | 'B' => 3,
                'R' => 5,
                'Q' => 9,
                'p' => -1,
                'n' | 'b' => -3,
                'r' => -5,
                'q' => -9,
                _ => 0,
            })
            .sum();
        let white_cp = material * 100;
        if fen.split_whitespace().nth(1) == Some("w") {
            white_cp
        } else {
            -white_cp
        }
    }
}

impl Evaluate for DeterministicEngine {
    async fn evaluate(&mut self, fen: &str) -> Result<EvalResult, AnalysisError> {
        self.calls += 1;
        Ok(EvalResult {
            cp: Some(Self::score_for(fen)),
            mate: None,
            best_move: Some("e2e4".to_string()),
        })
    }
}

#[tokio::test]
async fn six_ply_game_produces_six_complete_entries() {
    let record = parse_pgn(SIX_PLY_PGN).expect("valid PGN");
    let mut engine = DeterministicEngine::new();
    let analysis = analyze_game(&mut engine, &record).await.unwrap();

    assert_eq!(analysis.moves.len(), 6);
    // One evaluation per position: start + 6 plies
    assert_eq!(engine.calls, 7);

    let labels = [
        Label::Best,
        Label::Excellent,
        Label::Good,
        Label::Inaccuracy,
        Label::Mistake,
        Label::Blunder,
    ];
    for m in &analysis.moves {
        assert!(m.eval_before.win_prob.is_finite());
        assert!(m.eval_after.win_prob.is_finite());
        assert!(labels.contains(&m.classification));
        assert!((0.0..=100.0).contains(&m.accuracy));
    }

    assert_eq!(analysis.white_player, "Player1");
    assert_eq!(analysis.black_player, "Player2");
}

#[tokio::test]
async fn move_sequence_is_contiguous() {
    let record = parse_pgn(SIX_PLY_PGN).unwrap();
    let mut engine = DeterministicEngine::new();
    let analysis = analyze_game(&mut engine, &record).await.unwrap();

    // The first entry starts from the standard start position
    assert!(analysis.moves[0]
        .fen_before
        .starts_with("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"));

    // Every entry chains onto the previous one
    for pair in analysis.moves.windows(2) {
        assert_eq!(pair[0].fen_after, pair[1].fen_before);
    }

    // Side to move alternates with ply parity
    for (ply, m) in analysis.moves.iter().enumerate() {
        let side = m.fen_before.split_whitespace().nth(1).unwrap();
        assert_eq!(side, if ply % 2 == 0 { "w" } else { "b" });
    }
}

#[tokio::test]
async fn analysis_is_idempotent() {
    let record = parse_pgn(SCHOLARS_MATE_PGN).unwrap();

    let mut first_engine = DeterministicEngine::new();
    let first = analyze_game(&mut first_engine, &record).await.unwrap();
    let mut second_engine = DeterministicEngine::new();
    let second = analyze_game(&mut second_engine, &record).await.unwrap();

    assert_eq!(first.moves.len(), second.moves.len());
    for (a, b) in first.moves.iter().zip(&second.moves) {
        assert_eq!(a.classification, b.classification);
        assert_eq!(a.accuracy, b.accuracy);
        assert_eq!(a.eval_after, b.eval_after);
    }
    assert_eq!(first.white_accuracy, second.white_accuracy);
    assert_eq!(first.black_accuracy, second.black_accuracy);
}

#[tokio::test]
async fn aggregates_cover_both_players() {
    let record = parse_pgn(SCHOLARS_MATE_PGN).unwrap();
    let mut engine = DeterministicEngine::new();
    let analysis = analyze_game(&mut engine, &record).await.unwrap();

    // 7 plies: 4 white moves, 3 black moves
    assert_eq!(analysis.moves.len(), 7);
    assert!(analysis.white_accuracy.is_some());
    assert!(analysis.black_accuracy.is_some());
    // Mean of per-move accuracies stays on the 0-100 scale
    for aggregate in [analysis.white_accuracy, analysis.black_accuracy].into_iter().flatten() {
        assert!((0.0..=100.0).contains(&aggregate));
    }
}

#[tokio::test]
async fn illegal_movetext_aborts_with_malformed_game() {
    let bad_pgn = r#"[White "A"]
[Black "B"]
[Result "*"]

1. e4 Nf3 *"#;
    let record = parse_pgn(bad_pgn).expect("tokens parse, replay must fail");
    let mut engine = DeterministicEngine::new();
    let err = analyze_game(&mut engine, &record).await.unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedGame(_)));
    // Nothing was evaluated: no partial result ever existed
    assert_eq!(engine.calls, 0);
}

#[tokio::test]
async fn legacy_summary_is_a_projection_of_the_full_analysis() {
    let record = parse_pgn(SIX_PLY_PGN).unwrap();
    let mut engine = DeterministicEngine::new();
    let analysis = analyze_game(&mut engine, &record).await.unwrap();

    let summary = summarize(&analysis);
    assert_eq!(summary.len(), analysis.moves.len());
    for (s, m) in summary.iter().zip(&analysis.moves) {
        assert_eq!(s.san, m.san);
        assert_eq!(s.label, m.classification);
        assert_eq!(s.eval, m.eval_after.pawns);
        assert!((s.delta - (m.eval_after.pawns - m.eval_before.pawns)).abs() < 1e-12);
    }
}

#[test]
fn move_analysis_serializes_with_legacy_field_names() {
    let record = parse_pgn(SIX_PLY_PGN).unwrap();
    let mut engine = DeterministicEngine::new();
    let analysis = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(analyze_game(&mut engine, &record))
        .unwrap();

    let value = serde_json::to_value(&analysis).unwrap();
    let first = &value["moves"][0];
    assert_eq!(first["move"], "e4");
    assert_eq!(first["move_number"], 1);
    assert_eq!(first["classification"], "Best");
    assert!(first["fen_before"].is_string());
}
