//! Decision-core tests
//!
//! `Bot::decide` is the synchronous entry the HTTP layer wraps: it runs the
//! configured engine and always resolves to a direction through the
//! fallback chain, unless the request itself is inconsistent.

use std::time::Instant;

use sidewinder::board::{BoardState, Snake};
use sidewinder::bot::Bot;
use sidewinder::config::{Config, Engine};
use sidewinder::error::EngineError;
use sidewinder::types::{Coord, Direction};

fn coord(x: i32, y: i32) -> Coord {
    Coord { x, y }
}

fn snake(id: &str, health: i32, body: &[(i32, i32)]) -> Snake {
    Snake {
        id: id.to_string(),
        health,
        body: body.iter().map(|&(x, y)| coord(x, y)).collect(),
        eliminated: None,
    }
}

fn board(
    width: i32,
    height: i32,
    food: &[(i32, i32)],
    hazards: &[(i32, i32)],
    snakes: Vec<Snake>,
) -> BoardState {
    BoardState {
        width,
        height,
        food: food.iter().map(|&(x, y)| coord(x, y)).collect(),
        hazards: hazards.iter().map(|&(x, y)| coord(x, y)).collect(),
        snakes,
    }
}

fn config(engine: Engine) -> Config {
    let mut config = Config::default_hardcoded();
    config.strategy.engine = engine;
    config.minimax.depth = 1;
    config.minimax.solo_depth = 1;
    config.mcts.search_budget_ms = 30;
    config.mcts.round_horizon = 10;
    config.mcts.concurrent_trees = 2;
    config
}

#[test]
fn minimax_engine_answers_through_decide() {
    let state = board(11, 11, &[(6, 5)], &[], vec![snake("me", 10, &[(5, 5), (4, 5), (3, 5)])]);
    let result = Bot::decide(&config(Engine::Minimax), &state, "me", 3, Instant::now());
    assert_eq!(result.unwrap(), Direction::Right);
}

#[test]
fn greedy_engine_answers_through_decide() {
    let state = board(
        5,
        5,
        &[(4, 2)],
        &[],
        vec![
            snake("me", 90, &[(2, 2), (2, 1)]),
            snake("bigger", 90, &[(0, 4), (1, 4), (2, 4)]),
        ],
    );
    let result = Bot::decide(&config(Engine::Greedy), &state, "me", 3, Instant::now());
    assert_eq!(result.unwrap(), Direction::Right);
}

#[test]
fn mcts_engine_answers_through_decide() {
    let state = board(
        5,
        5,
        &[],
        &[],
        vec![snake("me", 90, &[(0, 0), (1, 0)]), snake("other", 90, &[(4, 4), (4, 3)])],
    );
    let result = Bot::decide(&config(Engine::Mcts), &state, "me", 3, Instant::now());
    // Only one open neighbor exists, every sampled tree agrees on it
    assert_eq!(result.unwrap(), Direction::Up);
}

#[test]
fn trapped_snake_still_gets_an_answer() {
    // Boxed in completely: the engine returns nothing, the fallback finds
    // no open neighbor either, and the contract still demands a direction
    let state = board(
        5,
        5,
        &[],
        &[],
        vec![snake("me", 90, &[(0, 0), (1, 0), (1, 1), (0, 1)])],
    );
    let result = Bot::decide(&config(Engine::Greedy), &state, "me", 5, Instant::now());
    assert_eq!(result.unwrap(), Direction::Up);
}

#[test]
fn unknown_snake_is_rejected() {
    let state = board(5, 5, &[], &[], vec![snake("other", 90, &[(2, 2), (2, 1)])]);
    let err = Bot::decide(&config(Engine::Greedy), &state, "ghost", 3, Instant::now()).unwrap_err();
    assert!(matches!(err, EngineError::SnakeMissing(_)));
}

#[test]
fn fallback_picks_the_most_open_neighbor() {
    // Hazard row seals everything above; the only breathing room is the
    // single pocket cell to the left
    let state = board(
        5,
        5,
        &[],
        &[(0, 1), (1, 1), (2, 1), (3, 1), (4, 1)],
        vec![snake("me", 90, &[(1, 0), (2, 0), (3, 0)])],
    );
    assert_eq!(Bot::fallback_move(&state, "me"), Some(Direction::Left));
}

#[test]
fn fallback_reports_none_when_every_neighbor_is_dead() {
    let state = board(
        5,
        5,
        &[],
        &[],
        vec![snake("me", 90, &[(0, 0), (1, 0), (1, 1), (0, 1)])],
    );
    assert_eq!(Bot::fallback_move(&state, "me"), None);
}
