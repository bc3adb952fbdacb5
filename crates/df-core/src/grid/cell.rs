//! Tile cell kinds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Kind of a single grid cell
///
/// Closed enumeration: candidate data from external providers must decode
/// into one of these via [`CellKind::from_code`] or be rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellKind {
    Floor = 0,
    #[default]
    Wall = 1,
    Door = 2,
    EntranceStairs = 3,
    ExitStairs = 4,
    Special = 5,
}

impl CellKind {
    /// Decode a raw candidate cell code, rejecting unknown values
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellKind::Floor),
            1 => Some(CellKind::Wall),
            2 => Some(CellKind::Door),
            3 => Some(CellKind::EntranceStairs),
            4 => Some(CellKind::ExitStairs),
            5 => Some(CellKind::Special),
            _ => None,
        }
    }

    /// Check if this is a wall
    pub const fn is_wall(&self) -> bool {
        matches!(self, CellKind::Wall)
    }

    /// Check if this is passable (can walk through)
    ///
    /// Everything except walls is passable for connectivity purposes.
    pub const fn is_passable(&self) -> bool {
        !self.is_wall()
    }

    /// Check if this is an entrance or exit staircase
    pub const fn is_stairs(&self) -> bool {
        matches!(self, CellKind::EntranceStairs | CellKind::ExitStairs)
    }

    /// Get the display character for this cell kind
    pub const fn symbol(&self) -> char {
        match self {
            CellKind::Floor => '.',
            CellKind::Wall => '#',
            CellKind::Door => '+',
            CellKind::EntranceStairs => '<',
            CellKind::ExitStairs => '>',
            CellKind::Special => '*',
        }
    }

    /// Inverse of [`CellKind::symbol`], used by test fixtures
    pub const fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' => Some(CellKind::Floor),
            '#' => Some(CellKind::Wall),
            '+' => Some(CellKind::Door),
            '<' => Some(CellKind::EntranceStairs),
            '>' => Some(CellKind::ExitStairs),
            '*' => Some(CellKind::Special),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_from_code_roundtrip() {
        for kind in CellKind::iter() {
            assert_eq!(CellKind::from_code(kind as u8), Some(kind));
        }
        assert_eq!(CellKind::from_code(6), None);
        assert_eq!(CellKind::from_code(255), None);
    }

    #[test]
    fn test_passability() {
        assert!(CellKind::Wall.is_wall());
        assert!(!CellKind::Wall.is_passable());
        for kind in CellKind::iter().filter(|k| !k.is_wall()) {
            assert!(kind.is_passable(), "{kind} should be passable");
        }
    }

    #[test]
    fn test_symbols_distinct() {
        let symbols: Vec<char> = CellKind::iter().map(|k| k.symbol()).collect();
        for (i, a) in symbols.iter().enumerate() {
            for b in &symbols[i + 1..] {
                assert_ne!(a, b);
            }
        }
        for kind in CellKind::iter() {
            assert_eq!(CellKind::from_symbol(kind.symbol()), Some(kind));
        }
    }
}
