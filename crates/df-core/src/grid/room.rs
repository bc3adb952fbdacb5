//! Rooms and spawn hints.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Axis-aligned rectangle claimed by the procedural generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// X coordinate of room interior (left edge)
    pub x: usize,
    /// Y coordinate of room interior (top edge)
    pub y: usize,
    /// Width of room interior
    pub width: usize,
    /// Height of room interior
    pub height: usize,
}

impl Room {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get center point of room
    pub fn center(&self) -> (usize, usize) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Interior area in cells
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Check if point is inside room
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Check if this room overlaps another when grown by `margin` cells
    ///
    /// A margin of 2 keeps at least two wall cells between accepted rooms.
    pub fn overlaps(&self, other: &Room, margin: usize) -> bool {
        let x1 = self.x.saturating_sub(margin);
        let y1 = self.y.saturating_sub(margin);
        let x2 = self.x + self.width + margin;
        let y2 = self.y + self.height + margin;

        !(x2 <= other.x
            || x1 >= other.x + other.width
            || y2 <= other.y
            || y1 >= other.y + other.height)
    }

    /// Check the room fits strictly inside a grid of the given size,
    /// leaving the border row/column untouched
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.width > 0
            && self.height > 0
            && self.x >= 1
            && self.y >= 1
            && self.x + self.width < width
            && self.y + self.height < height
    }
}

/// What an entity placement hint spawns
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Monster,
    Object,
    Npc,
}

/// Spawn hint attached to a room center
///
/// Produced alongside the grid but consumed downstream; this engine does
/// not validate what ends up spawned there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPlacement {
    pub kind: EntityKind,
    pub x: usize,
    pub y: usize,
    pub count: u32,
}
