//! Grid path search: A* point-to-point and flood-fill reachability.
//!
//! Both operations are read-only and tolerate grids that do not yet
//! satisfy the healed invariants (stairs may be missing, the border may be
//! open). Walls are impassable; every other cell kind is passable.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::grid::TileGrid;

/// Manhattan distance between two cells
///
/// Admissible and consistent for unit-cost 4-directional movement, so A*
/// paths are optimal.
pub fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Find a shortest path from `start` to `goal`, inclusive of both ends
///
/// A* over 4-connected neighbors with unit step cost and the Manhattan
/// heuristic. Frontier ties break by lowest f, then lowest cumulative
/// cost, then insertion order, so repeated calls on the same grid return
/// the identical path. Returns `None` when no path exists under the
/// current walls, or when either endpoint is out of bounds or a wall.
pub fn find_path(
    grid: &TileGrid,
    start: (usize, usize),
    goal: (usize, usize),
) -> Option<Vec<(usize, usize)>> {
    if !grid.in_bounds(start.0, start.1) || !grid.in_bounds(goal.0, goal.1) {
        return None;
    }
    if grid.get(start.0, start.1).is_wall() || grid.get(goal.0, goal.1).is_wall() {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    // Reverse turns the max-heap into a min-heap over (f, g, seq).
    let mut frontier: BinaryHeap<Reverse<(usize, usize, u64, (usize, usize))>> = BinaryHeap::new();
    let mut g_score: HashMap<(usize, usize), usize> = HashMap::new();
    let mut came_from: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    let mut seq: u64 = 0;

    g_score.insert(start, 0);
    frontier.push(Reverse((manhattan(start, goal), 0, seq, start)));

    while let Some(Reverse((_, g, _, pos))) = frontier.pop() {
        if pos == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        // Stale entry from a previous, worse relaxation
        if g > *g_score.get(&pos).unwrap_or(&usize::MAX) {
            continue;
        }

        for (nx, ny) in grid.ortho_neighbors(pos.0, pos.1) {
            if grid.get(nx, ny).is_wall() {
                continue;
            }
            let tentative = g + 1;
            if tentative < *g_score.get(&(nx, ny)).unwrap_or(&usize::MAX) {
                g_score.insert((nx, ny), tentative);
                came_from.insert((nx, ny), pos);
                seq += 1;
                frontier.push(Reverse((
                    tentative + manhattan((nx, ny), goal),
                    tentative,
                    seq,
                    (nx, ny),
                )));
            }
        }
    }

    None
}

fn reconstruct(
    came_from: &HashMap<(usize, usize), (usize, usize)>,
    start: (usize, usize),
    goal: (usize, usize),
) -> Vec<(usize, usize)> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = came_from[&current];
        path.push(current);
    }
    path.reverse();
    path
}

/// Compute the full set of cells reachable from `start`
///
/// Breadth-first traversal over passable cells; one pass is cheaper than
/// repeated pathfinding when checking global connectivity from a single
/// source. Returns the empty set when `start` is out of bounds or a wall.
pub fn flood_fill(grid: &TileGrid, start: (usize, usize)) -> HashSet<(usize, usize)> {
    let mut reachable = HashSet::new();
    if !grid.in_bounds(start.0, start.1) || grid.get(start.0, start.1).is_wall() {
        return reachable;
    }

    let mut queue = VecDeque::new();
    reachable.insert(start);
    queue.push_back(start);

    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in grid.ortho_neighbors(x, y) {
            if !grid.get(nx, ny).is_wall() && reachable.insert((nx, ny)) {
                queue.push_back((nx, ny));
            }
        }
    }

    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellKind;

    fn open_grid(w: usize, h: usize) -> TileGrid {
        let mut grid = TileGrid::new(w, h);
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                grid.set(x, y, CellKind::Floor);
            }
        }
        grid
    }

    #[test]
    fn test_straight_path_is_optimal() {
        let grid = open_grid(10, 10);
        let path = find_path(&grid, (1, 1), (8, 1)).unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(path[0], (1, 1));
        assert_eq!(path[7], (8, 1));
    }

    #[test]
    fn test_path_routes_around_wall() {
        let mut grid = open_grid(9, 9);
        // Vertical barrier with a gap at y == 7
        for y in 1..7 {
            grid.set(4, y, CellKind::Wall);
        }
        let path = find_path(&grid, (1, 1), (7, 1)).unwrap();
        assert!(path.contains(&(4, 7)), "path should pass through the gap");
        // Optimal detour: down to the gap, across, back up
        assert_eq!(path.len(), 19);
    }

    #[test]
    fn test_no_path_through_solid_wall() {
        let mut grid = open_grid(9, 9);
        for y in 0..9 {
            grid.set(4, y, CellKind::Wall);
        }
        assert!(find_path(&grid, (1, 1), (7, 1)).is_none());
    }

    #[test]
    fn test_endpoints_validated() {
        let grid = open_grid(9, 9);
        assert!(find_path(&grid, (0, 0), (5, 5)).is_none()); // wall start
        assert!(find_path(&grid, (1, 1), (20, 1)).is_none()); // out of bounds
        assert_eq!(find_path(&grid, (3, 3), (3, 3)), Some(vec![(3, 3)]));
    }

    #[test]
    fn test_doors_and_stairs_are_passable() {
        let mut grid = open_grid(7, 5);
        grid.set(3, 1, CellKind::Wall);
        grid.set(3, 2, CellKind::Door);
        grid.set(3, 3, CellKind::Wall);
        grid.set(1, 2, CellKind::EntranceStairs);
        grid.set(5, 2, CellKind::ExitStairs);
        let path = find_path(&grid, (1, 2), (5, 2)).unwrap();
        assert!(path.contains(&(3, 2)));
    }

    #[test]
    fn test_determinism() {
        let mut grid = open_grid(20, 20);
        // Scatter some obstacles so tie-breaking actually matters
        for i in 0..15 {
            grid.set(2 + i, 3 + (i * 7) % 13, CellKind::Wall);
        }
        let a = find_path(&grid, (1, 1), (18, 18));
        let b = find_path(&grid, (1, 1), (18, 18));
        assert_eq!(a, b);

        let fa = flood_fill(&grid, (1, 1));
        let fb = flood_fill(&grid, (1, 1));
        assert_eq!(fa, fb);
    }

    #[test]
    fn test_flood_fill_covers_open_region() {
        let grid = open_grid(10, 8);
        let reachable = flood_fill(&grid, (1, 1));
        assert_eq!(reachable.len(), 8 * 6);
    }

    #[test]
    fn test_flood_fill_excludes_pockets() {
        let mut grid = open_grid(11, 7);
        for y in 0..7 {
            grid.set(5, y, CellKind::Wall);
        }
        let reachable = flood_fill(&grid, (1, 1));
        assert!(reachable.contains(&(4, 1)));
        assert!(!reachable.contains(&(6, 1)));
    }

    #[test]
    fn test_flood_fill_from_wall_is_empty() {
        let grid = TileGrid::new(5, 5);
        assert!(flood_fill(&grid, (2, 2)).is_empty());
        assert!(flood_fill(&grid, (9, 9)).is_empty());
    }
}
