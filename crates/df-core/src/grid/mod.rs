//! Grid model
//!
//! Pure data: cell kinds, the tile grid, rooms, and spawn hints. No
//! algorithms live here; the pathfinder, healer, and generators all
//! operate on these types.

mod cell;
#[allow(clippy::module_inception)]
mod grid;
mod room;

use serde::{Deserialize, Serialize};

pub use cell::CellKind;
pub use grid::TileGrid;
pub use room::{EntityKind, EntityPlacement, Room};

/// The unit returned by generation and cached by the orchestrator
///
/// Immutable once cached; callers get shared read access, never a mutable
/// alias into the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub grid: TileGrid,
    pub rooms: Vec<Room>,
    pub entities: Vec<EntityPlacement>,
}
