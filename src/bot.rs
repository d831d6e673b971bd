// Bot orchestration
//
// Bridges the HTTP layer and the search engines. A move request builds a
// fresh BoardState, hands it to the configured engine on a rayon-backed
// blocking task, and always answers with one of the four directions: the
// engine result if there is one, otherwise the flood-fill fallback move,
// otherwise a fixed default. No state survives across requests.

use log::{info, warn};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::board::BoardState;
use crate::config::{Config, Engine};
use crate::debug_logger::DebugLogger;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::types::{Battlesnake, Board, Direction, Game};
use crate::{greedy, mcts, minimax, rules};

/// Battlesnake bot: static configuration plus the per-endpoint methods the
/// HTTP handlers delegate to
pub struct Bot {
    config: Config,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    pub fn new(config: Config, debug_logger: DebugLogger) -> Self {
        Bot { config, debug_logger }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "sidewinder",
            "color": "#5499C7",
            "head": "viper",
            "tail": "rattle",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, _game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME START");
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, _game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER");
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The search itself is CPU-bound and runs on a blocking task so the
    /// async reactor stays responsive. Malformed input is the only fatal
    /// outcome; a search without a result falls back instead of failing.
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Result<Value, EngineError> {
        let start_time = Instant::now();
        let turn = *turn;

        let state = BoardState::from_api(board);
        let me = you.id.clone();
        let config = self.config.clone();

        let chosen = tokio::task::spawn_blocking(move || {
            Bot::decide(&config, &state, &me, turn, start_time)
        })
        .await
        .map_err(|e| EngineError::Internal(format!("search task failed: {}", e)))??;

        info!(
            "Turn {}: chose {} ({}ms)",
            turn,
            chosen.as_str(),
            start_time.elapsed().as_millis()
        );
        self.debug_logger.log_move(turn, board.clone(), chosen);

        Ok(json!({ "move": chosen.as_str() }))
    }

    /// Synchronous decision core, also the entry point for tests. Runs the
    /// configured engine and resolves the fallback chain.
    pub fn decide(
        config: &Config,
        state: &BoardState,
        me: &str,
        turn: i32,
        start_time: Instant,
    ) -> Result<Direction, EngineError> {
        let my_snake = state
            .living()
            .find(|s| s.id == me)
            .ok_or_else(|| EngineError::SnakeMissing(me.to_string()))?;
        if my_snake.is_empty() {
            return Err(EngineError::EmptyBody(me.to_string()));
        }

        let ruleset = rules::infer_ruleset(state);

        let searched = match config.strategy.engine {
            Engine::Minimax => {
                let depth = if state.snakes.len() == 1 {
                    config.minimax.solo_depth
                } else {
                    config.minimax.depth
                };
                minimax::search(&ruleset, state, me, depth, &config.scores)?.best()
            }
            Engine::Mcts => {
                let budget = config
                    .mcts
                    .search_budget_ms
                    .min(config.timing.effective_budget_ms());
                let deadline = start_time + Duration::from_millis(budget);
                mcts::search(&ruleset, state, me, deadline, &config.mcts, None)?
            }
            Engine::Greedy => greedy::choose_move(state, me, turn, &config.scores),
        };

        if let Some(dir) = searched {
            return Ok(dir);
        }

        warn!("Turn {}: no search result, falling back to open space", turn);
        Ok(Self::fallback_move(state, me).unwrap_or(Direction::Up))
    }

    /// Last-resort move: the neighbor with the most reachable space. `None`
    /// when every neighbor is a dead end; the caller then answers with a
    /// fixed direction because the contract requires an answer.
    pub fn fallback_move(state: &BoardState, me: &str) -> Option<Direction> {
        let snake = state.living().find(|s| s.id == me)?;
        let head = snake.head()?;
        Grid::new(state).most_open_direction(head, snake.len())
    }
}
