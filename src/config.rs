// Configuration module for reading Snake.toml
//
// Every tunable lives here: time budgets, search depths, the score
// constants, and the MCTS parameters. The historical tunings drifted across
// bot iterations, so none of them is canonical; tests build their own
// Config instead of relying on one blessed set of values.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub strategy: StrategyConfig,
    pub timing: TimingConfig,
    pub minimax: MinimaxConfig,
    pub mcts: MctsConfig,
    pub scores: ScoresConfig,
    pub debug: DebugConfig,
}

/// Which search engine answers move requests
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Minimax,
    Mcts,
    Greedy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    pub engine: Engine,
}

/// Request time budget constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms
            .saturating_sub(self.network_overhead_ms)
    }
}

/// Minimax depth limits. Depth is the only time control minimax has: the
/// joint-move product grows as 4^snakes per ply, so these stay small.
#[derive(Debug, Deserialize, Clone)]
pub struct MinimaxConfig {
    pub depth: u8,
    pub solo_depth: u8,
}

/// MCTS search parameters
#[derive(Debug, Deserialize, Clone)]
pub struct MctsConfig {
    pub search_budget_ms: u64,
    pub round_horizon: u32,
    pub exploration_constant: f64,
    pub concurrent_trees: usize,
}

/// Transition scoring constants. Relative ordering matters more than the
/// exact magnitudes: lost_game dominates the strike terms, which dominate
/// tail chasing, which dominates the eating adjustments.
#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    pub lost_game: i64,
    pub better_strike_distance: i64,
    pub worse_strike_distance: i64,
    pub chasing_tail: i64,
    pub eat_when_hungry: i64,
    pub eat_when_healthy: i64,
    pub hungry_health_threshold: i32,
    pub starvation_margin: i32,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback.
    /// This should match the constants defined in Snake.toml.
    pub fn default_hardcoded() -> Self {
        Config {
            strategy: StrategyConfig { engine: Engine::Minimax },
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
            },
            minimax: MinimaxConfig { depth: 2, solo_depth: 3 },
            mcts: MctsConfig {
                search_budget_ms: 200,
                round_horizon: 60,
                exploration_constant: 1.4,
                concurrent_trees: 4,
            },
            scores: ScoresConfig {
                lost_game: -1000,
                better_strike_distance: 3,
                worse_strike_distance: -3,
                chasing_tail: 50,
                eat_when_hungry: 100,
                eat_when_healthy: -1,
                hungry_health_threshold: 15,
                starvation_margin: 2,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load Snake.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}
