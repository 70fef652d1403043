//! UCI engine wrapper (async I/O)

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::AnalysisError;

/// How long to keep draining after a `stop` before giving up on `bestmove`
const STOP_GRACE: Duration = Duration::from_millis(500);

/// Result of a single position evaluation.
///
/// `cp` and `mate` are relative to the side to move at the evaluated
/// position (UCI convention). Translation to a White-relative sign happens
/// in the normalizer, nowhere else.
#[derive(Debug, Clone)]
pub struct EvalResult {
    /// Centipawn score
    pub cp: Option<i32>,
    /// Mate in N moves (positive = side to move mates)
    pub mate: Option<i32>,
    /// Best move in UCI notation, if the engine suggested one
    pub best_move: Option<String>,
}

/// The evaluation seam: anything that can score a FEN. The analyzer is
/// generic over this, so a deterministic double can stand in for the
/// subprocess client in tests.
pub trait Evaluate {
    fn evaluate(
        &mut self,
        fen: &str,
    ) -> impl Future<Output = Result<EvalResult, AnalysisError>> + Send;
}

/// A single UCI engine process
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    search_depth: u32,
    movetime_ms: u64,
    ceiling: Duration,
}

impl StockfishEngine {
    /// Spawn a new engine process and initialize UCI
    pub async fn new(config: &EngineConfig) -> Result<Self, AnalysisError> {
        let mut process = Command::new(&config.engine_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| AnalysisError::EngineCrashed(format!("Failed to spawn engine: {e}")))?;

        let stdin = process.stdin.take().unwrap();
        let stdout = BufReader::new(process.stdout.take().unwrap());

        let mut engine = Self {
            process,
            stdin,
            stdout,
            search_depth: config.search_depth,
            movetime_ms: config.movetime_ms,
            ceiling: config.position_ceiling(),
        };

        // Initialize UCI
        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        // Configure for analysis
        engine.send("setoption name Threads value 1").await?;
        engine
            .send(&format!("setoption name Hash value {}", config.hash_mb))
            .await?;
        engine.send("setoption name UCI_AnalyseMode value true").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    /// Send a command to the engine
    async fn send(&mut self, cmd: &str) -> Result<(), AnalysisError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| AnalysisError::EngineCrashed(format!("Failed to write to engine: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| AnalysisError::EngineCrashed(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), AnalysisError> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self
                .stdout
                .read_line(&mut line)
                .await
                .map_err(|e| AnalysisError::EngineCrashed(format!("Failed to read from engine: {e}")))?;
            if n == 0 {
                return Err(AnalysisError::EngineCrashed(
                    "engine closed stdout during handshake".into(),
                ));
            }
            let trimmed = line.trim();
            debug!(line = trimmed, "SF >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    /// Evaluate a position. Issues `go` with both the fixed depth and the
    /// per-position movetime; the engine stops at whichever bound it reaches
    /// first, and the streamed principal score closest to completion wins.
    pub async fn evaluate(&mut self, fen: &str) -> Result<EvalResult, AnalysisError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!(
            "go depth {} movetime {}",
            self.search_depth, self.movetime_ms
        ))
        .await?;

        let mut result = EvalResult {
            cp: None,
            mate: None,
            best_move: None,
        };

        // The engine honors movetime itself; the client-side ceiling guards
        // against a wedged search.
        match timeout(
            self.ceiling,
            read_until_bestmove(&mut self.stdout, &mut result),
        )
        .await
        {
            Ok(read) => read?,
            Err(_) => {
                // Ceiling hit: stop the search and keep whatever score was
                // streamed so far. A degraded evaluation, not an error.
                warn!(fen, "engine exceeded position ceiling, stopping search");
                self.send("stop").await?;
                let drained = timeout(
                    STOP_GRACE,
                    read_until_bestmove(&mut self.stdout, &mut result),
                )
                .await;
                if drained.is_err() {
                    // Still no bestmove: resynchronize so a late one cannot
                    // poison the next search. An engine that ignores even
                    // isready is wedged; kill it and let the next call's
                    // write failure take the relaunch path.
                    self.send("isready").await?;
                    if timeout(STOP_GRACE, self.wait_for("readyok")).await.is_err() {
                        let _ = self.process.start_kill();
                    }
                }
            }
        }

        // Conforming engines stream at least one interim score before
        // completing; silence here means the process is wedged or gone.
        if result.cp.is_none() && result.mate.is_none() {
            return Err(AnalysisError::EngineCrashed(
                "search produced no score".into(),
            ));
        }

        Ok(result)
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Consume streamed search output, retaining the last reported principal
/// score, until the engine signals completion with `bestmove`.
async fn read_until_bestmove(
    stdout: &mut BufReader<ChildStdout>,
    result: &mut EvalResult,
) -> Result<(), AnalysisError> {
    let mut line = String::new();
    loop {
        line.clear();
        let n = stdout
            .read_line(&mut line)
            .await
            .map_err(|e| AnalysisError::EngineCrashed(format!("Failed to read from engine: {e}")))?;
        if n == 0 {
            return Err(AnalysisError::EngineCrashed(
                "engine closed stdout mid-search".into(),
            ));
        }
        let trimmed = line.trim();

        // Terminal positions report `score mate 0` with no pv, so key on
        // the score token alone.
        if trimmed.starts_with("info") && trimmed.contains(" score ") {
            if let Some(cp) = parse_cp(trimmed) {
                result.cp = Some(cp);
                result.mate = None;
            }
            if let Some(mate) = parse_mate(trimmed) {
                result.mate = Some(mate);
                result.cp = None;
            }
        } else if trimmed.starts_with("bestmove") {
            result.best_move = parse_bestmove(trimmed);
            return Ok(());
        }
    }
}

/// Engine client scoped to one analysis run. Owns the process and, when it
/// dies mid-search, relaunches it once for the current position before
/// surfacing the crash.
pub struct EngineClient {
    engine: StockfishEngine,
    config: EngineConfig,
}

impl EngineClient {
    pub async fn spawn(config: &EngineConfig) -> Result<Self, AnalysisError> {
        let engine = StockfishEngine::new(config).await?;
        Ok(Self {
            engine,
            config: config.clone(),
        })
    }

    /// Release the underlying process
    pub async fn shutdown(&mut self) {
        self.engine.quit().await;
    }
}

impl Evaluate for EngineClient {
    async fn evaluate(&mut self, fen: &str) -> Result<EvalResult, AnalysisError> {
        match self.engine.evaluate(fen).await {
            Err(AnalysisError::EngineCrashed(reason)) => {
                warn!(reason = %reason, "engine died mid-search, relaunching");
                self.engine = StockfishEngine::new(&self.config).await?;
                self.engine.evaluate(fen).await
            }
            other => other,
        }
    }
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "cp" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "mate" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse the move from a bestmove line; `(none)` (terminal position) is None
fn parse_bestmove(line: &str) -> Option<String> {
    let mv = line.split_whitespace().nth(1)?;
    if mv == "(none)" {
        return None;
    }
    Some(mv.to_string())
}
