//! Unit kinds and positions.

use strum::{Display, FromRepr, IntoStaticStr};

/// Kind discriminant stored at the head of every unit structure. Stable
/// across all supported versions; only the surrounding layout moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, Display, IntoStaticStr)]
#[repr(u32)]
pub enum UnitKind {
    Player = 0,
    Monster = 1,
    Object = 2,
    Missile = 3,
    Item = 4,
    Tile = 5,
}

impl UnitKind {
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Moving kinds carry a live path with native-resolution coordinates;
    /// everything else sits on a static path of tile + sub-tile pairs.
    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Player | Self::Monster | Self::Missile)
    }
}

/// A position in native (sub-tile) resolution, 65536 units per tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Draw parameters extracted from the cell context passed to the game's
/// image-draw routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawParameters {
    pub unit_id: u32,
    pub unit_kind: u32,
    pub unit_token: u32,
    pub unit_mode: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_kind_from_u32() {
        assert_eq!(UnitKind::from_u32(0), Some(UnitKind::Player));
        assert_eq!(UnitKind::from_u32(5), Some(UnitKind::Tile));
        assert_eq!(UnitKind::from_u32(6), None);
    }

    #[test]
    fn test_moving_split() {
        assert!(UnitKind::Player.is_moving());
        assert!(UnitKind::Monster.is_moving());
        assert!(UnitKind::Missile.is_moving());
        assert!(!UnitKind::Object.is_moving());
        assert!(!UnitKind::Item.is_moving());
        assert!(!UnitKind::Tile.is_moving());
    }
}
