//! A* pathfinding tests
//!
//! Cost model under test: empty cells cost 1, food 2, hazard and avoid
//! cells width * height. Snake cells block unless they are the destination.

use sidewinder::board::{BoardState, Snake};
use sidewinder::grid::Grid;
use sidewinder::pathfind::find_path;
use sidewinder::types::{Coord, Direction};

fn coord(x: i32, y: i32) -> Coord {
    Coord { x, y }
}

fn grid(
    width: i32,
    height: i32,
    food: &[(i32, i32)],
    hazards: &[(i32, i32)],
    bodies: &[&[(i32, i32)]],
) -> Grid {
    Grid::new(&BoardState {
        width,
        height,
        food: food.iter().map(|&(x, y)| coord(x, y)).collect(),
        hazards: hazards.iter().map(|&(x, y)| coord(x, y)).collect(),
        snakes: bodies
            .iter()
            .enumerate()
            .map(|(i, body)| Snake {
                id: format!("snake-{}", i),
                health: 100,
                body: body.iter().map(|&(x, y)| coord(x, y)).collect(),
                eliminated: None,
            })
            .collect(),
    })
}

#[test]
fn straight_line_costs_one_per_step() {
    let g = grid(5, 5, &[], &[], &[]);
    assert_eq!(find_path(&g, coord(0, 0), coord(3, 0)), Some((Direction::Right, 3)));
    assert_eq!(find_path(&g, coord(0, 0), coord(0, 3)), Some((Direction::Up, 3)));
    assert_eq!(find_path(&g, coord(3, 3), coord(3, 1)), Some((Direction::Down, 2)));
}

#[test]
fn identical_endpoints_yield_no_path() {
    let g = grid(5, 5, &[], &[], &[]);
    assert_eq!(find_path(&g, coord(2, 2), coord(2, 2)), None);
}

#[test]
fn food_destination_is_priced_above_empty() {
    let g = grid(5, 5, &[(3, 0)], &[], &[]);
    // Two empty steps plus the food cell itself at cost 2
    assert_eq!(find_path(&g, coord(0, 0), coord(3, 0)), Some((Direction::Right, 4)));
}

#[test]
fn hazard_forces_a_detour() {
    // 3x2 board with a hazard on the direct lane:
    //
    //   | . . . |
    //   | S x G |
    //
    // Direct costs 6 + 1, around the top costs 4.
    let g = grid(3, 2, &[], &[(1, 0)], &[]);
    assert_eq!(find_path(&g, coord(0, 0), coord(2, 0)), Some((Direction::Up, 4)));
}

#[test]
fn hazard_destination_is_reachable_but_expensive() {
    let g = grid(3, 1, &[], &[(2, 0)], &[]);
    // One empty step plus the hazard cell at width * height
    assert_eq!(find_path(&g, coord(0, 0), coord(2, 0)), Some((Direction::Right, 4)));
}

#[test]
fn avoid_cells_are_priced_like_hazards() {
    // An equal-length snake's head at (2,3) turns its open neighbors into
    // avoid cells on the overlay
    let state = BoardState {
        width: 5,
        height: 5,
        food: vec![],
        hazards: vec![],
        snakes: vec![
            Snake {
                id: "me".to_string(),
                health: 100,
                body: vec![coord(0, 0), coord(1, 0)],
                eliminated: None,
            },
            Snake {
                id: "rival".to_string(),
                health: 100,
                body: vec![coord(2, 3), coord(2, 4)],
                eliminated: None,
            },
        ],
    };
    let overlay = Grid::new(&state).with_avoid_zones(&state, "me");

    // As a destination the avoid cell still costs width * height
    assert_eq!(
        find_path(&overlay, coord(1, 2), coord(2, 2)),
        Some((Direction::Right, 25))
    );
    // A through-route bends south rather than pay the near-wall price
    assert_eq!(
        find_path(&overlay, coord(1, 2), coord(3, 2)),
        Some((Direction::Down, 4))
    );
}

#[test]
fn snake_wall_blocks_the_path() {
    let g = grid(5, 5, &[], &[], &[&[(2, 4), (2, 3), (2, 2), (2, 1), (2, 0)]]);
    assert_eq!(find_path(&g, coord(0, 0), coord(4, 0)), None);
}

#[test]
fn snake_cell_is_enterable_as_destination() {
    // Targeting a body segment works (hunting a head, chasing the own tail)
    let g = grid(5, 5, &[], &[], &[&[(2, 4), (2, 3), (2, 2), (2, 1), (2, 0)]]);
    let (dir, cost) = find_path(&g, coord(0, 2), coord(2, 2)).unwrap();
    assert_eq!(dir, Direction::Right);
    assert_eq!(cost, 2);
}

#[test]
fn cost_matches_manhattan_on_open_board() {
    let g = grid(7, 7, &[], &[], &[]);
    for (from, to) in [
        (coord(0, 0), coord(6, 6)),
        (coord(3, 1), coord(1, 5)),
        (coord(6, 0), coord(0, 2)),
    ] {
        let (_, cost) = find_path(&g, from, to).unwrap();
        assert_eq!(cost, from.manhattan(&to) as i64);
    }
}
