//! Engine-wide constants.

/// Default grid dimensions
pub const DEFAULT_WIDTH: usize = 40;
pub const DEFAULT_HEIGHT: usize = 40;

/// Hard ceiling on corridor-carving passes in the healer
pub const MAX_HEAL_ITERATIONS: usize = 100;

/// Room count bounds for the procedural generator
pub const MIN_ROOMS: usize = 4;
pub const MAX_ROOMS: usize = 8;

/// Room dimension bounds (interior cells)
pub const MIN_ROOM_SIZE: usize = 3;
pub const MAX_ROOM_SIZE: usize = 9;

/// Separation kept between accepted rooms
pub const ROOM_MARGIN: usize = 2;

/// Default number of finished levels kept in the synthesis cache
pub const DEFAULT_CACHE_CAPACITY: usize = 16;
