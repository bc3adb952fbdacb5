//! Connectivity repair ("healing") for candidate grids.
//!
//! Candidate layouts arrive in any state: stairs missing or duplicated,
//! rooms sealed off, borders breached. The healer repairs them in place
//! without discarding work already done: it locates or places the entrance
//! and exit, carves corridors until the two connect, re-checks global
//! reachability, and seals the border. Carving is monotonic; repair never
//! turns a walkable cell into a wall except on the border.

use crate::MAX_HEAL_ITERATIONS;
use crate::grid::{CellKind, TileGrid};
use crate::path::{find_path, flood_fill, manhattan};

/// Outcome of a healing pass
///
/// Healing never fails outright; a degenerate input (no floor cells to
/// anchor stairs on) yields `complete == false` and an untouched grid, and
/// the caller decides whether to retry with a fresh candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealReport {
    /// Entrance and exit were placed and connected to each other
    pub complete: bool,
    pub entrance: Option<(usize, usize)>,
    pub exit: Option<(usize, usize)>,
    /// Number of corridor carve passes the repair loop needed
    pub carve_passes: usize,
    /// Walkable cells the entrance cannot reach after repair
    ///
    /// Residual pockets are detected and logged but not repaired; the
    /// single entrance-exit corridor carve does not chase them.
    pub unreachable: usize,
}

impl HealReport {
    fn incomplete() -> Self {
        Self {
            complete: false,
            entrance: None,
            exit: None,
            carve_passes: 0,
            unreachable: 0,
        }
    }
}

/// Connectivity repair engine
#[derive(Debug, Clone)]
pub struct Healer {
    /// Hard ceiling on repair-loop iterations
    max_iterations: usize,
    /// Corridor width carved by the repair loop (1 = single cell)
    corridor_width: usize,
}

impl Default for Healer {
    fn default() -> Self {
        Self {
            max_iterations: MAX_HEAL_ITERATIONS,
            corridor_width: 1,
        }
    }
}

impl Healer {
    pub fn new(max_iterations: usize, corridor_width: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            corridor_width: corridor_width.max(1),
        }
    }

    /// Repair the grid in place so it satisfies the healed invariants
    ///
    /// Idempotent: healing an already-healed grid changes nothing, since
    /// the path check succeeds immediately and border sealing is a no-op.
    pub fn heal(&self, grid: &mut TileGrid) -> HealReport {
        let entrance_existing = self.existing_stairs(grid, CellKind::EntranceStairs);
        let exit_existing = self.existing_stairs(grid, CellKind::ExitStairs);

        // Missing entrance: floor cell closest to the grid origin.
        let Some(entrance) = entrance_existing
            .or_else(|| self.best_floor(grid, |pos| manhattan(pos, (0, 0)), false, None))
        else {
            log::warn!("healing impossible: no floor cell to anchor an entrance");
            return HealReport::incomplete();
        };
        // Missing exit: floor cell farthest from the entrance, which
        // approximates "opposite corners" without an all-pairs search.
        let Some(exit) = exit_existing.or_else(|| {
            self.best_floor(grid, |pos| manhattan(pos, entrance), true, Some(entrance))
        }) else {
            log::warn!("healing impossible: no floor cell to anchor an exit");
            return HealReport::incomplete();
        };

        grid.set(entrance.0, entrance.1, CellKind::EntranceStairs);
        grid.set(exit.0, exit.1, CellKind::ExitStairs);

        // Repair loop: carve straight corridors until the exit is
        // reachable or the iteration budget runs out.
        let mut connected = false;
        let mut carve_passes = 0;
        for _ in 0..self.max_iterations {
            if find_path(grid, entrance, exit).is_some() {
                connected = true;
                break;
            }
            self.carve_line(grid, entrance, exit);
            carve_passes += 1;
        }
        if !connected {
            connected = find_path(grid, entrance, exit).is_some();
        }

        // Global re-check: the corridor carve only guarantees the
        // entrance-exit link, not every pocket.
        let reachable = flood_fill(grid, entrance);
        let unreachable = grid
            .iter_cells()
            .filter(|&(x, y, kind)| kind.is_passable() && !reachable.contains(&(x, y)))
            .count();
        if unreachable > 0 {
            log::warn!(
                "{unreachable} walkable cell(s) remain unreachable from the entrance after repair"
            );
        }

        // Border integrity has priority over anything carving did.
        grid.seal_border();

        HealReport {
            complete: connected,
            entrance: Some(entrance),
            exit: Some(exit),
            carve_passes,
            unreachable,
        }
    }

    /// Find the existing staircase of the given kind
    ///
    /// Duplicates beyond the first are demoted to floor so that exactly
    /// one remains. Border cells never count, since border enforcement
    /// would wall them over again.
    fn existing_stairs(&self, grid: &mut TileGrid, kind: CellKind) -> Option<(usize, usize)> {
        let mut found = None;
        for (x, y) in grid.positions_of(kind) {
            if grid.on_border(x, y) {
                continue;
            }
            if found.is_none() {
                found = Some((x, y));
            } else {
                grid.set(x, y, CellKind::Floor);
            }
        }
        found
    }

    /// Interior floor cell optimizing the score; row-major scan order
    /// gives the lowest-y-then-lowest-x tie-break for free
    fn best_floor(
        &self,
        grid: &TileGrid,
        score: impl Fn((usize, usize)) -> usize,
        maximize: bool,
        exclude: Option<(usize, usize)>,
    ) -> Option<(usize, usize)> {
        grid.iter_cells()
            .filter(|&(x, y, kind)| kind == CellKind::Floor && !grid.on_border(x, y))
            .map(|(x, y, _)| (x, y))
            .filter(|&pos| Some(pos) != exclude)
            .reduce(|best, pos| {
                let better = if maximize {
                    score(pos) > score(best)
                } else {
                    score(pos) < score(best)
                };
                if better { pos } else { best }
            })
    }

    /// Carve a straight corridor from `a` to `b`, turning walls to floor
    ///
    /// Integer line rasterization in the Bresenham style, except that
    /// diagonal steps are split into two orthogonal steps so the carved
    /// corridor is 4-connected and actually walkable. With a corridor
    /// width above 1, orthogonal neighbors of each carved cell open too.
    fn carve_line(&self, grid: &mut TileGrid, a: (usize, usize), b: (usize, usize)) {
        let (mut x, mut y) = (a.0 as i64, a.1 as i64);
        let (tx, ty) = (b.0 as i64, b.1 as i64);
        let dx = (tx - x).abs();
        let dy = -(ty - y).abs();
        let sx = if x < tx { 1 } else { -1 };
        let sy = if y < ty { 1 } else { -1 };
        let mut err = dx + dy;

        self.carve_cell(grid, x, y);
        while x != tx || y != ty {
            let e2 = 2 * err;
            if e2 >= dy && x != tx {
                err += dy;
                x += sx;
                self.carve_cell(grid, x, y);
            }
            if e2 <= dx && y != ty {
                err += dx;
                y += sy;
                self.carve_cell(grid, x, y);
            }
        }
    }

    fn carve_cell(&self, grid: &mut TileGrid, x: i64, y: i64) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if !grid.in_bounds(x, y) {
            return;
        }
        if grid.get(x, y) == CellKind::Wall {
            grid.set(x, y, CellKind::Floor);
        }
        if self.corridor_width > 1 {
            let neighbors: Vec<_> = grid.ortho_neighbors(x, y).collect();
            for (nx, ny) in neighbors {
                if grid.get(nx, ny) == CellKind::Wall {
                    grid.set(nx, ny, CellKind::Floor);
                }
            }
        }
    }
}
