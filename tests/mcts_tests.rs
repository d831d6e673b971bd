//! MCTS engine tests
//!
//! Deadline handling and the trapped-position contract are deterministic
//! even though the search itself is randomized, so these fixtures pin the
//! edges: an expired budget must still answer, a trapped snake must not.

use std::time::{Duration, Instant};

use sidewinder::board::{BoardState, Snake};
use sidewinder::config::{Config, MctsConfig};
use sidewinder::error::EngineError;
use sidewinder::mcts::search;
use sidewinder::rules::{SoloRules, StandardRules};
use sidewinder::types::{Coord, Direction};

fn coord(x: i32, y: i32) -> Coord {
    Coord { x, y }
}

fn snake(id: &str, body: &[(i32, i32)]) -> Snake {
    Snake {
        id: id.to_string(),
        health: 90,
        body: body.iter().map(|&(x, y)| coord(x, y)).collect(),
        eliminated: None,
    }
}

fn board(width: i32, height: i32, snakes: Vec<Snake>) -> BoardState {
    BoardState { width, height, food: vec![], hazards: vec![], snakes }
}

fn cfg() -> MctsConfig {
    let mut cfg = Config::default_hardcoded().mcts;
    cfg.round_horizon = 10;
    cfg.concurrent_trees = 2;
    cfg
}

#[test]
fn expired_deadline_still_returns_a_legal_move() {
    let state = board(11, 11, vec![snake("me", &[(5, 5), (5, 4), (5, 3)])]);
    let deadline = Instant::now();

    let result = search(&SoloRules::default(), &state, "me", deadline, &cfg(), Some(7)).unwrap();
    // Zero iterations ran; the first legal action in enumeration order
    // (down is our own neck) answers anyway
    assert_eq!(result, Some(Direction::Up));
}

#[test]
fn trapped_snake_returns_none() {
    let state = board(5, 5, vec![snake("me", &[(0, 0), (1, 0), (1, 1), (0, 1)])]);
    let deadline = Instant::now() + Duration::from_millis(20);

    let result = search(&SoloRules::default(), &state, "me", deadline, &cfg(), Some(7)).unwrap();
    assert_eq!(result, None);
}

#[test]
fn single_open_direction_is_always_chosen() {
    let state = board(
        5,
        5,
        vec![snake("me", &[(0, 0), (1, 0)]), snake("other", &[(4, 4), (4, 3)])],
    );
    let deadline = Instant::now() + Duration::from_millis(50);

    let result = search(&StandardRules::new(), &state, "me", deadline, &cfg(), Some(7)).unwrap();
    assert_eq!(result, Some(Direction::Up));
}

#[test]
fn open_board_returns_one_of_the_open_directions() {
    let state = board(
        7,
        7,
        vec![snake("me", &[(3, 3), (3, 2)]), snake("other", &[(0, 6), (0, 5)])],
    );
    let deadline = Instant::now() + Duration::from_millis(50);

    let result = search(&StandardRules::new(), &state, "me", deadline, &cfg(), Some(42))
        .unwrap()
        .unwrap();
    // Down is our own neck, everything else is open
    assert!(matches!(result, Direction::Up | Direction::Left | Direction::Right));
}

#[test]
fn missing_snake_is_an_error() {
    let state = board(5, 5, vec![snake("other", &[(2, 2), (2, 1)])]);
    let deadline = Instant::now() + Duration::from_millis(10);

    let err = search(&SoloRules::default(), &state, "ghost", deadline, &cfg(), None).unwrap_err();
    assert!(matches!(err, EngineError::SnakeMissing(_)));
}
