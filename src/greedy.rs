// Greedy move selection
//
// The simplest strategy variant: no lookahead, just A* queries over a grid
// with avoid markers around the heads of snakes at least as long as us.
// Priorities in order: hunt the runner-up when we are strictly longest, eat
// along the shortest safe food path, coil toward the own tail. Returns
// `None` when nothing applies so the caller can fall back to the
// reachability-maximizing move.

use log::debug;

use crate::board::{ranked_snakes, BoardState};
use crate::config::ScoresConfig;
use crate::grid::Grid;
use crate::pathfind::find_path;
use crate::types::{Coord, Direction};

pub fn choose_move(
    state: &BoardState,
    me: &str,
    turn: i32,
    cfg: &ScoresConfig,
) -> Option<Direction> {
    let my_snake = state.snake(me).filter(|s| s.is_alive())?;
    let head = my_snake.head()?;
    let tail = my_snake.tail()?;

    let grid = Grid::new(state).with_avoid_zones(state, me);
    let ranked = ranked_snakes(state);

    let am_longest = ranked.first().map(|s| s.id == me).unwrap_or(false);
    let strictly_longest =
        am_longest && ranked.len() > 1 && ranked[0].length > ranked[1].length;

    if strictly_longest {
        if let Some((dir, dist)) = find_path(&grid, head, ranked[1].head) {
            if dist > 0 {
                debug!("greedy: hunting {}", ranked[1].id);
                return Some(dir);
            }
        }
    }

    if !am_longest || my_snake.health <= cfg.hungry_health_threshold {
        if let Some((dir, dist)) = shortest_safe_food_path(state, head, tail, &grid) {
            if !am_longest || my_snake.health - (dist as i32) <= cfg.starvation_margin {
                debug!("greedy: eating");
                return Some(dir);
            }
        }
    }

    if turn > 1 {
        if let Some((dir, dist)) = find_path(&grid, head, tail) {
            if dist > 1 {
                debug!("greedy: coiling");
                return Some(dir);
            }
        }
    }

    None
}

// Nearest food that is both reachable and escapable: a path must exist from
// the head to the food and from the food back to our tail, otherwise eating
// it walls us in.
fn shortest_safe_food_path(
    state: &BoardState,
    head: Coord,
    tail: Coord,
    grid: &Grid,
) -> Option<(Direction, i64)> {
    let mut food: Vec<Coord> = state.food.clone();
    food.sort_by_key(|f| f.manhattan(&head));

    for f in food {
        let (dir, dist) = match find_path(grid, head, f) {
            Some(found) => found,
            None => continue,
        };
        if find_path(grid, f, tail).is_none() {
            continue;
        }
        return Some((dir, dist));
    }

    None
}
