//! Game analysis engine: replays a game, drives a UCI engine through every
//! position, and classifies each move by how much it cost the mover.

pub mod accuracy;
pub mod analyzer;
pub mod classify;
pub mod config;
pub mod error;
pub mod eval;
pub mod pool;
pub mod stockfish;

pub use analyzer::{analyze_game, summarize, GameAnalysis, MoveAnalysis, MoveSummary};
pub use classify::Label;
pub use config::EngineConfig;
pub use error::AnalysisError;
pub use eval::NormalizedScore;
pub use pool::AnalysisPool;
pub use stockfish::{EngineClient, EvalResult, Evaluate};
