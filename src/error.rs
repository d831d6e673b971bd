// Engine error taxonomy
//
// Only genuinely fatal conditions are errors: inconsistent input snapshots
// and rule-engine advancement failures. A search that produces no result is
// not an error; callers handle it through the flood-fill fallback move.

use std::error::Error;
use std::fmt;

/// Fatal engine failures surfaced to the request handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The requesting snake is not among the living snakes on the board
    SnakeMissing(String),
    /// A snake in the snapshot has no body segments
    EmptyBody(String),
    /// A joint move did not assign a direction to a living snake
    MissingMove(String),
    /// Background search task failed to complete
    Internal(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SnakeMissing(id) => {
                write!(f, "snake '{}' is not alive on the board", id)
            }
            EngineError::EmptyBody(id) => write!(f, "snake '{}' has an empty body", id),
            EngineError::MissingMove(id) => {
                write!(f, "joint move is missing a direction for snake '{}'", id)
            }
            EngineError::Internal(msg) => write!(f, "internal engine failure: {}", msg),
        }
    }
}

impl Error for EngineError {}
