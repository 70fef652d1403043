//! Engine configuration from environment variables

use std::env;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Path to the UCI engine binary
    pub engine_path: String,

    /// Fixed search depth per position
    pub search_depth: u32,

    /// Wall-clock ceiling per position in milliseconds. The engine is asked
    /// to stop at whichever of depth/movetime is reached first.
    pub movetime_ms: u64,

    /// Hash table size passed to the engine, in MB
    pub hash_mb: u32,

    /// Maximum concurrent analysis runs (one engine process each)
    pub max_concurrent: usize,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            engine_path: env::var("STOCKFISH_PATH")
                .unwrap_or_else(|_| "/usr/games/stockfish".to_string()),
            search_depth: env::var("SEARCH_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            movetime_ms: env::var("MOVETIME_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            hash_mb: env::var("ENGINE_HASH_MB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
            max_concurrent: env::var("MAX_CONCURRENT_ANALYSES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(num_cpus::get),
        }
    }

    /// Client-side ceiling for one `evaluate` round trip. Wider than the
    /// engine's own movetime so a conforming engine always finishes first.
    pub fn position_ceiling(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.movetime_ms * 2 + 1_000)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_path: "/usr/games/stockfish".to_string(),
            search_depth: 15,
            movetime_ms: 100,
            hash_mb: 256,
            max_concurrent: num_cpus::get(),
        }
    }
}
