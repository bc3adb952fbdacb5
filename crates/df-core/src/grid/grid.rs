//! The tile grid: a fixed-size rectangular array of cell kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CellKind;
use crate::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// A width x height grid of cells, row-major, mutable in place during
/// repair.
///
/// A healed grid satisfies four invariants:
/// 1. every border cell is `Wall`;
/// 2. exactly one `EntranceStairs` and exactly one `ExitStairs`;
/// 3. every non-wall cell is reachable from the entrance via 4-directional
///    adjacency through non-wall cells;
/// 4. healing only ever turns `Wall` into `Floor` or places stairs on an
///    existing `Floor` cell (border enforcement excepted).
///
/// Nothing about the type itself enforces these; candidate grids are
/// expected to violate them until they pass through the healer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl TileGrid {
    /// Create a grid of the given dimensions, filled with walls
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::Wall; width * height],
        }
    }

    /// Build a grid from pre-decoded rows (row-major, top to bottom)
    ///
    /// Rows must be non-ragged; callers validate dimensions beforehand.
    pub fn from_cells(width: usize, height: usize, cells: Vec<CellKind>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a grid from a character map using the cell symbols
    ///
    /// Unknown characters become walls. Test fixtures use this heavily.
    pub fn from_symbols(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if let Some(kind) = CellKind::from_symbol(c) {
                    grid.set(x, y, kind);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check whether (x, y) lies inside the grid
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Check whether (x, y) lies on the grid border
    pub fn on_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Get the cell at (x, y); panics when out of bounds
    pub fn get(&self, x: usize, y: usize) -> CellKind {
        debug_assert!(self.in_bounds(x, y));
        self.cells[y * self.width + x]
    }

    /// Set the cell at (x, y); panics when out of bounds
    pub fn set(&mut self, x: usize, y: usize, kind: CellKind) {
        debug_assert!(self.in_bounds(x, y));
        self.cells[y * self.width + x] = kind;
    }

    /// Force every border cell to `Wall`
    pub fn seal_border(&mut self) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        for x in 0..self.width {
            self.set(x, 0, CellKind::Wall);
            self.set(x, self.height - 1, CellKind::Wall);
        }
        for y in 0..self.height {
            self.set(0, y, CellKind::Wall);
            self.set(self.width - 1, y, CellKind::Wall);
        }
    }

    /// Iterate all cells with their positions, row-major
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, CellKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &kind)| (i % self.width, i / self.width, kind))
    }

    /// All positions holding the given kind, in row-major scan order
    pub fn positions_of(&self, kind: CellKind) -> Vec<(usize, usize)> {
        self.iter_cells()
            .filter(|&(_, _, k)| k == kind)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// First position holding the given kind, in row-major scan order
    pub fn find(&self, kind: CellKind) -> Option<(usize, usize)> {
        self.iter_cells()
            .find(|&(_, _, k)| k == kind)
            .map(|(x, y, _)| (x, y))
    }

    /// Count cells of the given kind
    pub fn count_of(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&k| k == kind).count()
    }

    /// In-bounds 4-directional neighbors of (x, y)
    pub fn ortho_neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        const ORTHO: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
        ORTHO.into_iter().filter_map(move |(dx, dy)| {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            (nx >= 0 && ny >= 0 && self.in_bounds(nx as usize, ny as usize))
                .then_some((nx as usize, ny as usize))
        })
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self.get(x, y).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_all_wall() {
        let grid = TileGrid::new(10, 8);
        assert_eq!(grid.count_of(CellKind::Wall), 80);
        assert_eq!(grid.count_of(CellKind::Floor), 0);
    }

    #[test]
    fn test_get_set() {
        let mut grid = TileGrid::new(5, 5);
        grid.set(2, 3, CellKind::Floor);
        assert_eq!(grid.get(2, 3), CellKind::Floor);
        assert_eq!(grid.get(3, 2), CellKind::Wall);
    }

    #[test]
    fn test_bounds() {
        let grid = TileGrid::new(5, 3);
        assert!(grid.in_bounds(4, 2));
        assert!(!grid.in_bounds(5, 2));
        assert!(!grid.in_bounds(4, 3));
        assert!(grid.on_border(0, 1));
        assert!(grid.on_border(4, 1));
        assert!(grid.on_border(2, 0));
        assert!(!grid.on_border(2, 1));
    }

    #[test]
    fn test_seal_border() {
        let mut grid = TileGrid::new(6, 6);
        for y in 0..6 {
            for x in 0..6 {
                grid.set(x, y, CellKind::Floor);
            }
        }
        grid.seal_border();
        for (x, y, kind) in grid.iter_cells() {
            if grid.on_border(x, y) {
                assert_eq!(kind, CellKind::Wall, "border at ({x}, {y})");
            } else {
                assert_eq!(kind, CellKind::Floor, "interior at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_from_symbols_roundtrip() {
        let rows = ["#####", "#.<.#", "#.>.#", "#####"];
        let grid = TileGrid::from_symbols(&rows);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.get(2, 1), CellKind::EntranceStairs);
        assert_eq!(grid.get(2, 2), CellKind::ExitStairs);
        let rendered = grid.to_string();
        let expected: String = rows.iter().map(|r| format!("{r}\n")).collect();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_scan_order_is_row_major() {
        let mut grid = TileGrid::new(4, 4);
        grid.set(3, 1, CellKind::Floor);
        grid.set(1, 2, CellKind::Floor);
        assert_eq!(grid.positions_of(CellKind::Floor), vec![(3, 1), (1, 2)]);
        assert_eq!(grid.find(CellKind::Floor), Some((3, 1)));
    }

    #[test]
    fn test_ortho_neighbors_clipped_at_edges() {
        let grid = TileGrid::new(3, 3);
        let corner: Vec<_> = grid.ortho_neighbors(0, 0).collect();
        assert_eq!(corner.len(), 2);
        let center: Vec<_> = grid.ortho_neighbors(1, 1).collect();
        assert_eq!(center.len(), 4);
    }
}
