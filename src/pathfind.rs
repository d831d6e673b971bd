// Pathfinding engine
//
// One-shot A* queries over the four-connected grid with a Manhattan
// heuristic. Entering an empty cell costs 1 and food costs 2, so paths avoid
// routing through food they were not asked to collect. Hazard and avoid
// cells cost width * height, effectively impassable unless they are the
// destination. Snake cells block unless they are the destination (so a path
// can target another snake's head or our own tail).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::grid::{CellContent, Grid};
use crate::types::{Coord, Direction};

#[derive(Debug, PartialEq, Eq)]
struct OpenNode {
    f: i64,
    seq: u64,
    p: Coord,
}

// Min-heap on f-score; equal f-scores pop in insertion order so repeated
// queries over the same grid are stable.
impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest path from `from` to `to`. Returns the direction of the first
/// step and the accumulated path cost, or `None` when no path exists or the
/// points coincide. The cost is a distance estimate, not a strict step
/// count, because food and hazard cells are priced above 1.
pub fn find_path(grid: &Grid, from: Coord, to: Coord) -> Option<(Direction, i64)> {
    let path = search(grid, from, to)?;
    if path.len() < 2 {
        return None;
    }

    let next = path[1];
    let dir = if next.y > from.y {
        Direction::Up
    } else if next.y < from.y {
        Direction::Down
    } else if next.x > from.x {
        Direction::Right
    } else {
        Direction::Left
    };

    let mut cost = 0i64;
    for step in path.iter().skip(1) {
        cost += step_cost(grid, step);
    }

    Some((dir, cost))
}

// Snake cells price at 1 here: the search only ever admits them as the
// destination.
fn step_cost(grid: &Grid, p: &Coord) -> i64 {
    match grid.cell(p).map(|c| c.content) {
        Some(CellContent::Food) => 2,
        Some(CellContent::Hazard) | Some(CellContent::Avoid) => {
            (grid.width as i64) * (grid.height as i64)
        }
        _ => 1,
    }
}

fn search(grid: &Grid, from: Coord, to: Coord) -> Option<Vec<Coord>> {
    let mut open = BinaryHeap::new();
    let mut g_cost: HashMap<Coord, i64> = HashMap::new();
    let mut parent: HashMap<Coord, Coord> = HashMap::new();
    let mut closed: HashMap<Coord, bool> = HashMap::new();
    let mut seq = 0u64;

    g_cost.insert(from, 0);
    open.push(OpenNode { f: from.manhattan(&to) as i64, seq, p: from });

    while let Some(OpenNode { p: current, .. }) = open.pop() {
        if closed.get(&current).copied().unwrap_or(false) {
            continue;
        }
        closed.insert(current, true);

        if current == to {
            let mut path = vec![current];
            let mut node = current;
            while let Some(&prev) = parent.get(&node) {
                path.push(prev);
                node = prev;
            }
            path.reverse();
            return Some(path);
        }

        let current_cost = g_cost.get(&current).copied().unwrap_or(i64::MAX);
        for dir in Direction::all() {
            let neighbor = dir.apply(&current);
            let cell = match grid.cell(&neighbor) {
                Some(c) => c,
                None => continue,
            };

            let cost = match cell.content {
                CellContent::Empty | CellContent::Food | CellContent::Hazard
                | CellContent::Avoid => current_cost + step_cost(grid, &neighbor),
                CellContent::Snake => {
                    if neighbor != to {
                        continue;
                    }
                    current_cost + 1
                }
            };

            if cost < g_cost.get(&neighbor).copied().unwrap_or(i64::MAX) {
                g_cost.insert(neighbor, cost);
                parent.insert(neighbor, current);
                closed.insert(neighbor, false);
                seq += 1;
                open.push(OpenNode {
                    f: cost + neighbor.manhattan(&to) as i64,
                    seq,
                    p: neighbor,
                });
            }
        }
    }

    None
}
