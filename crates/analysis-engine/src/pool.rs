//! Bounded pool of concurrent analysis runs.

use std::sync::Arc;
use std::time::Duration;

use chess_core::game_data::GameRecord;
use chess_core::pgn;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::warn;

use crate::analyzer::{analyze_game, summarize, GameAnalysis, MoveSummary};
use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::stockfish::EngineClient;

/// Fixed margin added to every run ceiling
const RUN_CEILING_MARGIN: Duration = Duration::from_secs(10);

/// Runs games through dedicated engine processes, at most `max_concurrent`
/// at a time. A run queued beyond capacity waits without evaluating.
pub struct AnalysisPool {
    semaphore: Arc<Semaphore>,
    config: EngineConfig,
}

impl AnalysisPool {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            config,
        }
    }

    /// Hard ceiling for a whole run, scaled to the N+1 positions evaluated.
    fn run_ceiling(&self, plies: usize) -> Duration {
        self.config.position_ceiling() * (plies as u32 + 1) + RUN_CEILING_MARGIN
    }

    /// Analyze one game. Acquires a pool slot and spawns a dedicated engine
    /// process for the run; both are released on every exit path (the
    /// engine's Drop kills the process if this future is cancelled mid-run).
    pub async fn analyze(&self, record: &GameRecord) -> Result<GameAnalysis, AnalysisError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("analysis semaphore closed");

        let mut client = EngineClient::spawn(&self.config).await?;
        let ceiling = self.run_ceiling(record.moves.len());

        let result = match timeout(ceiling, analyze_game(&mut client, record)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    ceiling_secs = ceiling.as_secs(),
                    plies = record.moves.len(),
                    "run ceiling exceeded, aborting analysis"
                );
                Err(AnalysisError::RunTimeout(ceiling))
            }
        };

        client.shutdown().await;
        result
    }

    /// Legacy entry: PGN text in, reduced `{move, eval, delta, label}`
    /// summaries out.
    pub async fn analyze_pgn(&self, pgn_text: &str) -> Result<Vec<MoveSummary>, AnalysisError> {
        let record = pgn::parse_pgn(pgn_text)
            .ok_or_else(|| AnalysisError::MalformedGame("invalid or empty PGN".into()))?;
        let analysis = self.analyze(&record).await?;
        Ok(summarize(&analysis))
    }
}
