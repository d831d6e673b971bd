// Monte Carlo tree search engine
//
// Alternative to the exhaustive minimax: trades exhaustiveness for depth by
// sampling under a wall-clock deadline. A simultaneous round is decomposed
// into sequential single-snake decisions; the tree branches on one snake's
// direction at a time and the ruleset only advances the board once every
// living snake has chosen. Independent trees grow in parallel, each owning
// its own nodes; root statistics merge under a single lock at the end.

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;

use crate::board::{BoardState, SnakeMove};
use crate::config::MctsConfig;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::rules::Ruleset;
use crate::types::Direction;

/// A search position. A round is in progress until every living snake has
/// committed a direction; the ruleset then resolves the joint move and the
/// next round starts from the resolved board.
#[derive(Debug, Clone)]
enum Position {
    RoundInProgress {
        state: BoardState,
        grid: Grid,
        chosen: Vec<SnakeMove>,
        rounds_left: u32,
    },
    RoundResolved {
        state: BoardState,
        grid: Grid,
        rounds_left: u32,
    },
}

impl Position {
    fn root(state: BoardState, rounds_left: u32) -> Position {
        let grid = Grid::new(&state);
        Position::RoundResolved { state, grid, rounds_left }
    }

    fn state(&self) -> &BoardState {
        match self {
            Position::RoundInProgress { state, .. } => state,
            Position::RoundResolved { state, .. } => state,
        }
    }

    fn grid(&self) -> &Grid {
        match self {
            Position::RoundInProgress { grid, .. } => grid,
            Position::RoundResolved { grid, .. } => grid,
        }
    }

    fn rounds_left(&self) -> u32 {
        match self {
            Position::RoundInProgress { rounds_left, .. } => *rounds_left,
            Position::RoundResolved { rounds_left, .. } => *rounds_left,
        }
    }

    fn chosen(&self) -> &[SnakeMove] {
        match self {
            Position::RoundInProgress { chosen, .. } => chosen,
            Position::RoundResolved { .. } => &[],
        }
    }

    // Living snakes act in board order, except `me` always acts first so the
    // root of the tree branches on our own move.
    fn actors(&self, me: &str) -> Vec<String> {
        let mut actors: Vec<String> = Vec::new();
        if self.state().living().any(|s| s.id == me) {
            actors.push(me.to_string());
        }
        for snake in self.state().living() {
            if snake.id != me {
                actors.push(snake.id.clone());
            }
        }
        actors
    }

    fn next_actor(&self, me: &str) -> Option<String> {
        self.actors(me).get(self.chosen().len()).cloned()
    }

    /// Directions whose destination cell is open right now for the next
    /// actor. Validated against cell occupancy, not the heavier flood fill.
    fn legal_actions(&self, me: &str) -> Vec<Direction> {
        let actor = match self.next_actor(me) {
            Some(a) => a,
            None => return Vec::new(),
        };
        let head = match self.state().snake(&actor).and_then(|s| s.head()) {
            Some(h) => h,
            None => return Vec::new(),
        };

        Direction::all()
            .iter()
            .filter(|dir| self.grid().is_open(&dir.apply(&head)))
            .copied()
            .collect()
    }

    /// Commits a direction for the next actor. Completing the round advances
    /// the board through the ruleset and resolves a new position.
    fn apply<R: Ruleset>(&self, rules: &R, me: &str, dir: Direction) -> Result<Position, EngineError> {
        let actor = self
            .next_actor(me)
            .ok_or_else(|| EngineError::Internal("no actor left in round".to_string()))?;

        let mut chosen = self.chosen().to_vec();
        chosen.push(SnakeMove { id: actor, dir });

        if chosen.len() < self.actors(me).len() {
            return Ok(Position::RoundInProgress {
                state: self.state().clone(),
                grid: self.grid().clone(),
                chosen,
                rounds_left: self.rounds_left(),
            });
        }

        let next = rules.advance(self.state(), &chosen)?;
        let grid = Grid::new(&next);
        Ok(Position::RoundResolved {
            state: next,
            grid,
            rounds_left: self.rounds_left().saturating_sub(1),
        })
    }

    /// Terminal when the round horizon is spent, the acting snake is
    /// trapped, the ruleset reports game over, or we are eliminated. A
    /// trapped snake is a valid terminal position, never a panic.
    fn is_terminal<R: Ruleset>(&self, rules: &R, me: &str) -> bool {
        if self.rounds_left() == 0 {
            return true;
        }
        let we_died = self
            .state()
            .snake(me)
            .map(|s| !s.is_alive())
            .unwrap_or(true);
        if we_died {
            return true;
        }
        if rules.is_game_over(self.state()) {
            return true;
        }
        self.legal_actions(me).is_empty()
    }

    /// Snakes counted as winners from this terminal position: every living
    /// snake, except the actor that sits trapped with no way out.
    fn winners(&self, me: &str) -> Vec<String> {
        let trapped = if self.legal_actions(me).is_empty() {
            self.next_actor(me)
        } else {
            None
        };

        self.state()
            .living()
            .filter(|s| Some(&s.id) != trapped.as_ref())
            .map(|s| s.id.clone())
            .collect()
    }
}

struct Node {
    position: Position,
    /// Snake that committed the move leading into this node
    mover: Option<String>,
    parent: Option<usize>,
    action: Option<Direction>,
    children: Vec<usize>,
    untried: Vec<Direction>,
    terminal: bool,
    visits: f64,
    reward: f64,
}

struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new<R: Ruleset>(rules: &R, position: Position, me: &str) -> Tree {
        let untried = position.legal_actions(me);
        let terminal = position.is_terminal(rules, me);
        Tree {
            nodes: vec![Node {
                position,
                mover: None,
                parent: None,
                action: None,
                children: Vec::new(),
                untried,
                terminal,
                visits: 0.0,
                reward: 0.0,
            }],
        }
    }

    // One select/expand/rollout/backpropagate pass
    fn iterate<R: Ruleset>(
        &mut self,
        rules: &R,
        me: &str,
        cfg: &MctsConfig,
        rng: &mut SmallRng,
    ) -> Result<(), EngineError> {
        let mut idx = 0usize;

        // Selection: descend fully-expanded nodes by UCB1
        while self.nodes[idx].untried.is_empty()
            && !self.nodes[idx].children.is_empty()
            && !self.nodes[idx].terminal
        {
            idx = self.select_child(idx, cfg.exploration_constant);
        }

        // Expansion
        if !self.nodes[idx].terminal && !self.nodes[idx].untried.is_empty() {
            let pick = rng.random_range(0..self.nodes[idx].untried.len());
            let dir = self.nodes[idx].untried.swap_remove(pick);
            let mover = self.nodes[idx].position.next_actor(me);
            let position = self.nodes[idx].position.apply(rules, me, dir)?;
            let untried = position.legal_actions(me);
            let terminal = position.is_terminal(rules, me);
            let child = Node {
                position,
                mover,
                parent: Some(idx),
                action: Some(dir),
                children: Vec::new(),
                untried,
                terminal,
                visits: 0.0,
                reward: 0.0,
            };
            self.nodes.push(child);
            let child_idx = self.nodes.len() - 1;
            self.nodes[idx].children.push(child_idx);
            idx = child_idx;
        }

        // Rollout
        let winners = rollout(rules, self.nodes[idx].position.clone(), me, rng)?;

        // Backpropagation: credit each node to the snake that moved into it
        let share = if winners.is_empty() { 0.0 } else { 1.0 / winners.len() as f64 };
        let mut walk = Some(idx);
        while let Some(i) = walk {
            self.nodes[i].visits += 1.0;
            if let Some(mover) = &self.nodes[i].mover {
                if winners.iter().any(|w| w == mover) {
                    self.nodes[i].reward += share;
                }
            }
            walk = self.nodes[i].parent;
        }

        Ok(())
    }

    fn select_child(&self, idx: usize, exploration: f64) -> usize {
        let parent_visits = self.nodes[idx].visits.max(1.0);
        let mut best = self.nodes[idx].children[0];
        let mut best_ucb = f64::MIN;

        for &child in &self.nodes[idx].children {
            let node = &self.nodes[child];
            let ucb = if node.visits == 0.0 {
                f64::MAX
            } else {
                node.reward / node.visits
                    + exploration * (parent_visits.ln() / node.visits).sqrt()
            };
            if ucb > best_ucb {
                best_ucb = ucb;
                best = child;
            }
        }
        best
    }

    // Visit count and reward per root action
    fn root_stats(&self) -> HashMap<Direction, (f64, f64)> {
        let mut stats = HashMap::new();
        for &child in &self.nodes[0].children {
            let node = &self.nodes[child];
            if let Some(dir) = node.action {
                let entry = stats.entry(dir).or_insert((0.0, 0.0));
                entry.0 += node.visits;
                entry.1 += node.reward;
            }
        }
        stats
    }
}

// Random playout until a terminal position or the rollout cap
fn rollout<R: Ruleset>(
    rules: &R,
    mut position: Position,
    me: &str,
    rng: &mut SmallRng,
) -> Result<Vec<String>, EngineError> {
    while !position.is_terminal(rules, me) {
        let actions = position.legal_actions(me);
        let dir = actions[rng.random_range(0..actions.len())];
        position = position.apply(rules, me, dir)?;
    }
    Ok(position.winners(me))
}

/// Time-bounded MCTS for `me`. Grows `cfg.concurrent_trees` independent
/// trees until `deadline`, merges their root statistics, and returns the
/// most-visited root direction. An already-expired deadline still returns a
/// legal direction when one exists; `None` means we are trapped and the
/// caller should fall back.
pub fn search<R: Ruleset + Sync>(
    rules: &R,
    state: &BoardState,
    me: &str,
    deadline: Instant,
    cfg: &MctsConfig,
    seed: Option<u64>,
) -> Result<Option<Direction>, EngineError> {
    if !state.living().any(|s| s.id == me) {
        return Err(EngineError::SnakeMissing(me.to_string()));
    }

    let root = Position::root(state.clone(), cfg.round_horizon);
    let legal = root.legal_actions(me);
    if legal.is_empty() {
        return Ok(None);
    }

    let merged: Mutex<HashMap<Direction, (f64, f64)>> = Mutex::new(HashMap::new());
    let trees = cfg.concurrent_trees.max(1);

    (0..trees)
        .into_par_iter()
        .try_for_each(|i| {
            let mut rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s.wrapping_add(i as u64)),
                None => SmallRng::from_os_rng(),
            };
            let mut tree = Tree::new(rules, root.clone(), me);
            while Instant::now() < deadline {
                tree.iterate(rules, me, cfg, &mut rng)?;
            }

            let stats = tree.root_stats();
            let mut merged = merged.lock();
            for (dir, (visits, reward)) in stats {
                let entry = merged.entry(dir).or_insert((0.0, 0.0));
                entry.0 += visits;
                entry.1 += reward;
            }
            Ok::<(), EngineError>(())
        })?;

    let merged = merged.into_inner();
    let mut best: Option<(Direction, f64)> = None;
    for dir in Direction::all() {
        if let Some(&(visits, _)) = merged.get(&dir) {
            match best {
                Some((_, high)) if visits <= high => {}
                _ => best = Some((dir, visits)),
            }
        }
    }

    // Expired before any expansion: any legal action beats blocking
    Ok(best.map(|(dir, _)| dir).or_else(|| legal.first().copied()))
}
