// Search-domain board model
//
// The wire types in `types.rs` mirror the Battlesnake API; search works on
// this leaner model instead. A `BoardState` is built fresh per request (or
// per branch through `Ruleset::advance`) and discarded after the search.

use crate::types::{Board, Coord, Direction};

/// Why a snake was removed from play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminatedCause {
    OutOfBounds,
    OutOfHealth,
    SelfCollision,
    BodyCollision,
    HeadToHead,
}

/// One competing snake: identity, ordered body (head first), health
#[derive(Debug, Clone)]
pub struct Snake {
    pub id: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub eliminated: Option<EliminatedCause>,
}

impl Snake {
    pub fn is_alive(&self) -> bool {
        self.eliminated.is_none()
    }

    pub fn head(&self) -> Option<Coord> {
        self.body.first().copied()
    }

    pub fn tail(&self) -> Option<Coord> {
        self.body.last().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// One direction choice for one snake; a joint move is a slice of these,
/// one per living snake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeMove {
    pub id: String,
    pub dir: Direction,
}

/// Full board snapshot: the root of every search
#[derive(Debug, Clone)]
pub struct BoardState {
    pub width: i32,
    pub height: i32,
    pub food: Vec<Coord>,
    pub hazards: Vec<Coord>,
    pub snakes: Vec<Snake>,
}

impl BoardState {
    /// Builds a search state from an API board snapshot. Every snake the API
    /// sends is alive; eliminations only appear on states the rule engine
    /// produced.
    pub fn from_api(board: &Board) -> Self {
        BoardState {
            width: board.width,
            height: board.height,
            food: board.food.clone(),
            hazards: board.hazards.clone(),
            snakes: board
                .snakes
                .iter()
                .map(|s| Snake {
                    id: s.id.clone(),
                    health: s.health,
                    body: s.body.clone(),
                    eliminated: None,
                })
                .collect(),
        }
    }

    pub fn snake(&self, id: &str) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id == id)
    }

    /// Living snakes in board order
    pub fn living(&self) -> impl Iterator<Item = &Snake> {
        self.snakes.iter().filter(|s| s.is_alive())
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }
}

/// Snake summary used when ranking by length
#[derive(Debug, Clone)]
pub struct RankedSnake {
    pub id: String,
    pub length: usize,
    pub head: Coord,
}

/// Living snakes ordered longest first. Ties keep board order.
pub fn ranked_snakes(state: &BoardState) -> Vec<RankedSnake> {
    let mut ranked: Vec<RankedSnake> = state
        .living()
        .filter_map(|s| {
            Some(RankedSnake {
                id: s.id.clone(),
                length: s.len(),
                head: s.head()?,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.length.cmp(&a.length));
    ranked
}
