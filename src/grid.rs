// Grid model and reachability engine
//
// A `Grid` classifies every in-bounds cell once per board snapshot. Snake
// cells carry a tail time-to-live: the number of ticks until that body
// segment vacates its cell. Flood fill uses the TTL to treat trailing tails
// as walls that open up while the traversal is still counting.

use std::collections::HashSet;

use crate::board::BoardState;
use crate::types::{Coord, Direction};

/// Classification of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellContent {
    Empty,
    Food,
    Snake,
    Hazard,
    /// Derived marker for cells next to the head of a snake at least as
    /// long as the evaluating snake; pathfinding prices these as near-walls
    Avoid,
}

/// One grid cell. `ttl` is only meaningful for `Snake` cells: the number of
/// ticks until the occupying segment vacates (1 for the tail tip).
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub content: CellContent,
    pub ttl: i32,
    pub head: bool,
}

impl Cell {
    fn empty() -> Self {
        Cell { content: CellContent::Empty, ttl: 0, head: false }
    }
}

/// Dense cell map for one board snapshot. Built fresh per request or branch;
/// never mutated afterwards. Derived variants (the avoid overlay) are new
/// grids so other readers of the base grid stay unaffected.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds the grid for a board state. Only living snakes occupy cells;
    /// the head cell is tagged distinctly and each segment's TTL is
    /// (body length - index from head).
    pub fn new(state: &BoardState) -> Self {
        let len = (state.width * state.height).max(0) as usize;
        let mut grid = Grid {
            width: state.width,
            height: state.height,
            cells: vec![Cell::empty(); len],
        };

        for p in &state.food {
            grid.set(p, Cell { content: CellContent::Food, ttl: 0, head: false });
        }

        for p in &state.hazards {
            grid.set(p, Cell { content: CellContent::Hazard, ttl: 0, head: false });
        }

        for snake in state.living() {
            let body_len = snake.len() as i32;
            for (i, p) in snake.body.iter().enumerate() {
                // Stacked segments (spawn turns) keep the head tag; the TTL
                // keeps the tail-most segment's value
                let was_head = grid.cell(p).map(|c| c.head).unwrap_or(false);
                grid.set(
                    p,
                    Cell {
                        content: CellContent::Snake,
                        ttl: body_len - i as i32,
                        head: i == 0 || was_head,
                    },
                );
            }
        }

        grid
    }

    fn index(&self, p: &Coord) -> Option<usize> {
        if p.x < 0 || p.x >= self.width || p.y < 0 || p.y >= self.height {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    fn set(&mut self, p: &Coord, cell: Cell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    /// Cell at a coordinate, `None` when out of bounds
    pub fn cell(&self, p: &Coord) -> Option<&Cell> {
        self.index(p).map(|i| &self.cells[i])
    }

    /// True when the cell is in bounds and free to move into right now
    pub fn is_open(&self, p: &Coord) -> bool {
        matches!(
            self.cell(p).map(|c| c.content),
            Some(CellContent::Empty) | Some(CellContent::Food)
        )
    }

    /// Derived grid with `Avoid` markers on every open cell adjacent to the
    /// head of any other snake at least as long as `me`. The base grid is
    /// left untouched. Threat heads are read off the grid itself: a head
    /// cell's TTL equals the owning snake's body length.
    pub fn with_avoid_zones(&self, state: &BoardState, me: &str) -> Grid {
        let me_snake = state.snake(me);
        let my_len = me_snake.map(|s| s.len() as i32).unwrap_or(0);
        let my_head = me_snake.and_then(|s| s.head());
        let mut overlay = self.clone();

        for y in 0..self.height {
            for x in 0..self.width {
                let p = Coord { x, y };
                let cell = match self.cell(&p) {
                    Some(c) => *c,
                    None => continue,
                };
                if !cell.head || cell.ttl < my_len || Some(p) == my_head {
                    continue;
                }
                for dir in Direction::all() {
                    let n = dir.apply(&p);
                    if overlay.is_open(&n) {
                        overlay.set(&n, Cell { content: CellContent::Avoid, ttl: 0, head: false });
                    }
                }
            }
        }

        overlay
    }

    /// Counts how many cells a snake could occupy starting from `start`,
    /// up to `limit`. Empty and food cells count; a snake cell becomes
    /// passable once the count has already reached that segment's TTL (the
    /// tail will have vacated by the time we arrive). Hazard and avoid cells
    /// never count. The result never exceeds `limit`.
    pub fn flood_fill(&self, start: Coord, limit: usize) -> usize {
        let mut visited: HashSet<Coord> = HashSet::new();
        let mut frontier = vec![start];
        // Snake cells seen before their segment vacates, keyed by TTL
        let mut waiting: Vec<(i32, Coord)> = Vec::new();
        let mut found = 0usize;

        while found < limit {
            let p = match frontier.pop() {
                Some(p) => p,
                None => {
                    match waiting.iter().position(|&(ttl, _)| ttl as usize <= found) {
                        Some(i) => {
                            frontier.push(waiting.swap_remove(i).1);
                            continue;
                        }
                        None => break,
                    }
                }
            };

            if visited.contains(&p) {
                continue;
            }
            let cell = match self.cell(&p) {
                Some(c) => c,
                None => continue,
            };

            match cell.content {
                CellContent::Empty | CellContent::Food => {}
                CellContent::Snake => {
                    if cell.ttl as usize > found {
                        waiting.push((cell.ttl, p));
                        continue;
                    }
                }
                CellContent::Hazard | CellContent::Avoid => {
                    visited.insert(p);
                    continue;
                }
            }

            visited.insert(p);
            found += 1;
            for dir in Direction::all() {
                frontier.push(dir.apply(&p));
            }
        }

        found
    }

    /// Neighbor of `start` with the largest reachable area, or `None` when
    /// every neighbor is a dead end. This is the fallback move when no
    /// search strategy produced a result.
    pub fn most_open_direction(&self, start: Coord, body_len: usize) -> Option<Direction> {
        let mut best: Option<Direction> = None;
        let mut biggest = 0usize;
        for dir in Direction::all() {
            let area = self.flood_fill(dir.apply(&start), body_len.max(1));
            if area > biggest {
                biggest = area;
                best = Some(dir);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Snake;

    fn state(width: i32, height: i32, food: &[(i32, i32)], bodies: &[&[(i32, i32)]]) -> BoardState {
        BoardState {
            width,
            height,
            food: food.iter().map(|&(x, y)| Coord { x, y }).collect(),
            hazards: vec![],
            snakes: bodies
                .iter()
                .enumerate()
                .map(|(i, body)| Snake {
                    id: format!("snake-{}", i),
                    health: 100,
                    body: body.iter().map(|&(x, y)| Coord { x, y }).collect(),
                    eliminated: None,
                })
                .collect(),
        }
    }

    #[test]
    fn grid_marks_food_and_bodies() {
        let s = state(5, 5, &[(4, 4)], &[&[(2, 2), (2, 1), (2, 0)]]);
        let grid = Grid::new(&s);

        assert_eq!(grid.cell(&Coord { x: 4, y: 4 }).unwrap().content, CellContent::Food);

        let head = grid.cell(&Coord { x: 2, y: 2 }).unwrap();
        assert_eq!(head.content, CellContent::Snake);
        assert!(head.head);
        assert_eq!(head.ttl, 3);

        let tail = grid.cell(&Coord { x: 2, y: 0 }).unwrap();
        assert!(!tail.head);
        assert_eq!(tail.ttl, 1);

        assert!(grid.cell(&Coord { x: 5, y: 0 }).is_none());
    }

    #[test]
    fn avoid_overlay_does_not_touch_base_grid() {
        let s = state(7, 7, &[], &[&[(1, 1), (1, 0)], &[(4, 4), (4, 3), (4, 2)]]);
        let grid = Grid::new(&s);
        let overlay = grid.with_avoid_zones(&s, "snake-0");

        // Larger snake-1 head at (4,4): its open neighbors become avoid cells
        assert_eq!(overlay.cell(&Coord { x: 3, y: 4 }).unwrap().content, CellContent::Avoid);
        assert_eq!(overlay.cell(&Coord { x: 4, y: 5 }).unwrap().content, CellContent::Avoid);
        // The head itself stays a snake cell
        assert_eq!(overlay.cell(&Coord { x: 4, y: 4 }).unwrap().content, CellContent::Snake);
        // Base grid unchanged
        assert_eq!(grid.cell(&Coord { x: 3, y: 4 }).unwrap().content, CellContent::Empty);
    }
}
