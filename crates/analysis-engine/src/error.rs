//! Analysis error types

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The game itself is unusable: bad PGN, or a SAN token that cannot be
    /// legally applied. Client-input error; the run aborts with no output.
    #[error("malformed game: {0}")]
    MalformedGame(String),

    /// The engine process died and the single relaunch-and-retry for the
    /// current position also failed.
    #[error("engine crashed: {0}")]
    EngineCrashed(String),

    /// The run-level hard ceiling was exceeded.
    #[error("analysis exceeded run ceiling of {0:?}")]
    RunTimeout(Duration),
}

impl From<chess_core::replay::ReplayError> for AnalysisError {
    fn from(e: chess_core::replay::ReplayError) -> Self {
        AnalysisError::MalformedGame(e.to_string())
    }
}
