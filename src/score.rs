// Heuristic scoring function
//
// Scores a single state transition from one snake's perspective. The
// magnitudes are configuration values, but their relative ordering is part
// of the contract: elimination dominates strike distance, strike distance
// dominates tail chasing, tail chasing dominates the eating bonus.

use crate::board::{BoardState, Snake};
use crate::config::ScoresConfig;

/// Desirability of moving from `prev` to `next` for snake `id`
pub fn score_transition(prev: &BoardState, next: &BoardState, id: &str, cfg: &ScoresConfig) -> i64 {
    let prev_me = match prev.snake(id) {
        Some(s) if s.is_alive() && !s.is_empty() => s,
        _ => return cfg.lost_game,
    };
    let next_me = match next.snake(id) {
        Some(s) if s.is_alive() && !s.is_empty() => s,
        _ => return cfg.lost_game,
    };

    let mut res = 0i64;

    // Closing on shorter snakes is good, closing on longer ones is not.
    // The signed aggregate adds distance to weaker heads and subtracts it
    // for stronger ones, so a numerically lower aggregate is better.
    let prev_strike = strike_distance(prev, prev_me);
    let next_strike = strike_distance(next, next_me);
    if next_strike <= prev_strike {
        res += cfg.better_strike_distance;
    } else {
        res += cfg.worse_strike_distance;
    }

    // Staying near the own tail rewards coiling into defensible space
    if tail_distance(next_me) <= tail_distance(prev_me) {
        res += cfg.chasing_tail;
    }

    // Eating matters when health is low or someone else is longer; eating
    // while already safely the longest just adds exposed surface
    if next_me.len() > prev_me.len() {
        let longest = next.living().map(|s| s.len()).max().unwrap_or(0);
        if next_me.len() < longest || prev_me.health <= cfg.hungry_health_threshold {
            res += cfg.eat_when_hungry;
        } else {
            res += cfg.eat_when_healthy;
        }
    }

    res
}

fn strike_distance(state: &BoardState, me: &Snake) -> i64 {
    let my_head = match me.head() {
        Some(h) => h,
        None => return 0,
    };

    let mut aggregate = 0i64;
    for other in state.living().filter(|s| s.id != me.id) {
        let other_head = match other.head() {
            Some(h) => h,
            None => continue,
        };
        let dist = other_head.manhattan(&my_head) as i64;
        if other.len() < me.len() {
            aggregate += dist;
        } else {
            aggregate -= dist;
        }
    }
    aggregate
}

fn tail_distance(snake: &Snake) -> i64 {
    match (snake.head(), snake.tail()) {
        (Some(head), Some(tail)) => head.manhattan(&tail) as i64,
        _ => 0,
    }
}
