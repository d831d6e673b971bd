// Minimax search engine
//
// Exhaustive depth-bounded search over the joint-move cartesian product of
// all living snakes. Every combination is an independent rayon work unit:
// flood-fill prune each snake's destination, advance through the ruleset,
// score the transition for us, recurse, and fold the result into the bucket
// of our own move in that combination. Buckets merge by reduction; the only
// synchronization is rayon's final reduce. Depth is the caller's time
// control: the branching factor is 4^N per ply, so depth stays small.

use rayon::prelude::*;
use std::collections::HashMap;

use crate::board::{BoardState, SnakeMove};
use crate::config::ScoresConfig;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::rules::Ruleset;
use crate::score::score_transition;
use crate::types::{Coord, Direction};

/// Accumulated score per own first-move direction. A bucket stays
/// unexplored while every combination assigning that move was pruned;
/// unexplored buckets never win selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveScores {
    scores: [i64; 4],
    explored: [bool; 4],
}

impl MoveScores {
    pub fn add(&mut self, dir: Direction, score: i64) {
        let i = dir.index();
        self.scores[i] = self.scores[i].saturating_add(score);
        self.explored[i] = true;
    }

    pub fn get(&self, dir: Direction) -> Option<i64> {
        let i = dir.index();
        self.explored[i].then(|| self.scores[i])
    }

    /// Sum over explored buckets; the recursive contribution of a subtree
    pub fn total(&self) -> i64 {
        let mut total = 0i64;
        for i in 0..4 {
            if self.explored[i] {
                total = total.saturating_add(self.scores[i]);
            }
        }
        total
    }

    /// Direction with the strictly greatest score. Ties keep the earliest
    /// direction in enumeration order (up, down, left, right). `None` when
    /// every bucket is unexplored.
    pub fn best(&self) -> Option<Direction> {
        let mut best: Option<(Direction, i64)> = None;
        for dir in Direction::all() {
            if let Some(score) = self.get(dir) {
                match best {
                    Some((_, high)) if score <= high => {}
                    _ => best = Some((dir, score)),
                }
            }
        }
        best.map(|(dir, _)| dir)
    }

    fn merge(mut self, other: MoveScores) -> MoveScores {
        for dir in Direction::all() {
            if let Some(score) = other.get(dir) {
                self.add(dir, score);
            }
        }
        self
    }
}

/// Depth-bounded joint-move search from `me`'s perspective. The caller must
/// guarantee `me` is alive in `state`; branches where `me` dies terminate as
/// losses instead of recursing.
pub fn search<R: Ruleset + Sync>(
    rules: &R,
    state: &BoardState,
    me: &str,
    depth: u8,
    cfg: &ScoresConfig,
) -> Result<MoveScores, EngineError> {
    if depth == 0 {
        return Ok(MoveScores::default());
    }
    if !state.living().any(|s| s.id == me) {
        return Err(EngineError::SnakeMissing(me.to_string()));
    }

    let grid = Grid::new(state);

    // Head and length per living snake, for the survivability prune
    let mut heads: HashMap<&str, (Coord, usize)> = HashMap::new();
    for snake in state.living() {
        let head = snake
            .head()
            .ok_or_else(|| EngineError::EmptyBody(snake.id.clone()))?;
        heads.insert(snake.id.as_str(), (head, snake.len()));
    }

    joint_moves(state)
        .into_par_iter()
        .map(|combo| evaluate_combo(rules, state, me, depth, cfg, &grid, &heads, combo))
        .try_fold(MoveScores::default, |acc, res| {
            res.map(|scores| match scores {
                Some((dir, score)) => {
                    let mut acc = acc;
                    acc.add(dir, score);
                    acc
                }
                None => acc,
            })
        })
        .try_reduce(MoveScores::default, |a, b| Ok(a.merge(b)))
}

// One joint-move combination: prune, advance, score, recurse. Returns the
// bucket assignment, or `None` when the combination is pruned away.
#[allow(clippy::too_many_arguments)]
fn evaluate_combo<R: Ruleset + Sync>(
    rules: &R,
    state: &BoardState,
    me: &str,
    depth: u8,
    cfg: &ScoresConfig,
    grid: &Grid,
    heads: &HashMap<&str, (Coord, usize)>,
    combo: Vec<SnakeMove>,
) -> Result<Option<(Direction, i64)>, EngineError> {
    // A move whose destination cannot reach as many cells as the mover's
    // body length ends in a self-trap; assume no snake picks one. This only
    // narrows our search, it is not opponent modeling.
    for mv in &combo {
        let (head, len) = heads
            .get(mv.id.as_str())
            .ok_or_else(|| EngineError::SnakeMissing(mv.id.clone()))?;
        if grid.flood_fill(mv.dir.apply(head), *len) < *len {
            return Ok(None);
        }
    }

    let own_dir = combo
        .iter()
        .find(|m| m.id == me)
        .map(|m| m.dir)
        .ok_or_else(|| EngineError::MissingMove(me.to_string()))?;

    let next = rules.advance(state, &combo)?;
    let mut score = score_transition(state, &next, me, cfg);

    let alive = next.snake(me).map(|s| s.is_alive()).unwrap_or(false);
    if alive && depth > 1 {
        let sub = search(rules, &next, me, depth - 1, cfg)?;
        score = score.saturating_add(sub.total());
    }

    Ok(Some((own_dir, score)))
}

/// Cartesian product of candidate directions across living snakes, each
/// snake's moves enumerated up, down, left, right.
fn joint_moves(state: &BoardState) -> Vec<Vec<SnakeMove>> {
    let mut combos: Vec<Vec<SnakeMove>> = vec![Vec::new()];
    for snake in state.living() {
        let mut extended = Vec::with_capacity(combos.len() * 4);
        for combo in &combos {
            for dir in Direction::all() {
                let mut next = combo.clone();
                next.push(SnakeMove { id: snake.id.clone(), dir });
                extended.push(next);
            }
        }
        combos = extended;
    }
    combos
}
