// Rule engine
//
// The search engines never re-derive collision or elimination rules; they
// hand a joint move to a `Ruleset` and consume the resulting state. The
// standard implementation resolves simultaneous movement, feeding, hazard
// damage, and eliminations. Food spawning is deliberately absent so search
// branches stay deterministic.

use crate::board::{BoardState, EliminatedCause, Snake, SnakeMove};
use crate::error::EngineError;
use crate::types::Coord;

/// Advances board states and detects game end. Implementations must be
/// side-effect free: `advance` returns a fresh state and never mutates its
/// input.
pub trait Ruleset {
    /// Resolves one tick given one move per living snake. Fails only on an
    /// internally inconsistent input (a living snake without a move or with
    /// an empty body); that is fatal to the whole search, not recoverable.
    fn advance(&self, state: &BoardState, moves: &[SnakeMove]) -> Result<BoardState, EngineError>;

    /// True once the game has ended from this state
    fn is_game_over(&self, state: &BoardState) -> bool;
}

/// Standard multiplayer rules: the game ends when at most one snake remains
#[derive(Debug, Clone, Copy)]
pub struct StandardRules {
    /// Extra health lost per tick while the head sits in a hazard cell
    pub hazard_damage: i32,
}

impl StandardRules {
    pub fn new() -> Self {
        StandardRules { hazard_damage: 0 }
    }

    pub fn with_hazard_damage(hazard_damage: i32) -> Self {
        StandardRules { hazard_damage }
    }
}

impl Default for StandardRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Solo rules: same resolution, but the game only ends once the last snake
/// is eliminated
#[derive(Debug, Clone, Copy, Default)]
pub struct SoloRules {
    pub standard: StandardRules,
}

impl Ruleset for StandardRules {
    fn advance(&self, state: &BoardState, moves: &[SnakeMove]) -> Result<BoardState, EngineError> {
        let mut next = state.clone();

        // Simultaneous movement: push the new head, pop the tail, lose one
        // health. Growth happens in the feeding phase by re-appending.
        for snake in next.snakes.iter_mut().filter(|s| s.is_alive()) {
            let mv = moves
                .iter()
                .find(|m| m.id == snake.id)
                .ok_or_else(|| EngineError::MissingMove(snake.id.clone()))?;
            let head = snake
                .head()
                .ok_or_else(|| EngineError::EmptyBody(snake.id.clone()))?;

            snake.body.insert(0, mv.dir.apply(&head));
            snake.body.pop();
            snake.health -= 1;
        }

        if self.hazard_damage > 0 {
            for snake in next.snakes.iter_mut().filter(|s| s.is_alive()) {
                if let Some(head) = snake.head() {
                    if next.hazards.contains(&head) {
                        snake.health -= self.hazard_damage;
                    }
                }
            }
        }

        feed_snakes(&mut next);
        eliminate_snakes(&mut next);

        Ok(next)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.living_count() <= 1
    }
}

impl Ruleset for SoloRules {
    fn advance(&self, state: &BoardState, moves: &[SnakeMove]) -> Result<BoardState, EngineError> {
        self.standard.advance(state, moves)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.living_count() == 0
    }
}

/// Picks the ruleset the way production did: solo rules for a lone snake,
/// hazard damage active whenever the board carries hazards.
pub fn infer_ruleset(state: &BoardState) -> Box<dyn Ruleset + Send + Sync> {
    if state.snakes.len() == 1 {
        return Box::new(SoloRules::default());
    }
    if state.hazards.is_empty() {
        Box::new(StandardRules::new())
    } else {
        Box::new(StandardRules::with_hazard_damage(1))
    }
}

impl<R: Ruleset + ?Sized> Ruleset for Box<R> {
    fn advance(&self, state: &BoardState, moves: &[SnakeMove]) -> Result<BoardState, EngineError> {
        (**self).advance(state, moves)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        (**self).is_game_over(state)
    }
}

impl<R: Ruleset + ?Sized> Ruleset for &R {
    fn advance(&self, state: &BoardState, moves: &[SnakeMove]) -> Result<BoardState, EngineError> {
        (**self).advance(state, moves)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        (**self).is_game_over(state)
    }
}

// A snake whose head lands on food refills to full health and grows by
// duplicating its tail segment. All snakes feed from the pre-removal food
// list, then eaten food disappears.
fn feed_snakes(state: &mut BoardState) {
    let mut eaten: Vec<Coord> = Vec::new();

    for snake in state.snakes.iter_mut().filter(|s| s.is_alive()) {
        let head = match snake.head() {
            Some(h) => h,
            None => continue,
        };
        if state.food.contains(&head) {
            snake.health = 100;
            if let Some(tail) = snake.tail() {
                snake.body.push(tail);
            }
            if !eaten.contains(&head) {
                eaten.push(head);
            }
        }
    }

    state.food.retain(|f| !eaten.contains(f));
}

// Eliminations are judged simultaneously against the post-move snapshot.
// Wall and starvation first, then self, body, and head-to-head collisions.
// A head-to-head removes the snake that is not strictly longer.
fn eliminate_snakes(state: &mut BoardState) {
    let snapshot: Vec<Snake> = state.snakes.clone();
    let width = state.width;
    let height = state.height;

    for snake in state.snakes.iter_mut().filter(|s| s.is_alive()) {
        let head = match snake.head() {
            Some(h) => h,
            None => continue,
        };

        snake.eliminated = judge(snake, head, width, height, &snapshot);
    }
}

fn judge(
    snake: &Snake,
    head: Coord,
    width: i32,
    height: i32,
    snapshot: &[Snake],
) -> Option<EliminatedCause> {
    if head.x < 0 || head.x >= width || head.y < 0 || head.y >= height {
        return Some(EliminatedCause::OutOfBounds);
    }
    if snake.health <= 0 {
        return Some(EliminatedCause::OutOfHealth);
    }
    if snake.body[1..].contains(&head) {
        return Some(EliminatedCause::SelfCollision);
    }

    for other in snapshot.iter().filter(|s| s.is_alive() && s.id != snake.id) {
        if other.body[1..].contains(&head) {
            return Some(EliminatedCause::BodyCollision);
        }
        if other.head() == Some(head) && snake.len() <= other.len() {
            return Some(EliminatedCause::HeadToHead);
        }
    }

    None
}
