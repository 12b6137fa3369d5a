//! Per-version structure layout constants.
//!
//! The game never documented these structures; the offsets are externally
//! collected static data. Unit layouts changed twice across the supported
//! range (1.09, 1.10, and 1.12 onward), the path sub-structures never did.

use crate::version::GameVersion;

/// Field offsets inside a unit structure.
#[derive(Debug, Clone, Copy)]
pub struct UnitLayout {
    pub kind: u64,
    pub unit_id: u64,
    pub act: u64,
    /// Pointer slot interpreted as live path or static path depending on the
    /// unit kind.
    pub path: u64,
}

pub const UNIT_V109: UnitLayout = UnitLayout {
    kind: 0x00,
    unit_id: 0x0C,
    act: 0x1C,
    path: 0x28,
};

pub const UNIT_V110: UnitLayout = UnitLayout {
    kind: 0x00,
    unit_id: 0x0C,
    act: 0x1C,
    path: 0x2C,
};

/// 1.12 and everything after share the 1.12 unit layout.
pub const UNIT_V112: UnitLayout = UnitLayout {
    kind: 0x00,
    unit_id: 0x0C,
    act: 0x1C,
    path: 0x2C,
};

impl UnitLayout {
    pub fn for_version(version: GameVersion) -> Option<&'static UnitLayout> {
        match version {
            GameVersion::Lod109d => Some(&UNIT_V109),
            GameVersion::Lod110f => Some(&UNIT_V110),
            GameVersion::Lod112
            | GameVersion::Lod113c
            | GameVersion::Lod113d
            | GameVersion::Lod114d => Some(&UNIT_V112),
            GameVersion::Unsupported => None,
        }
    }
}

/// Live path of a moving unit: coordinates already in native resolution.
pub mod path {
    pub const X: u64 = 0x00;
    pub const Y: u64 = 0x04;
}

/// Static path of a stationary unit: whole tiles plus a sub-tile offset per
/// axis. Native position is `tile * TILE_SCALE + sub`.
pub mod static_path {
    pub const TILE_X: u64 = 0x04;
    pub const TILE_Y: u64 = 0x08;
    pub const SUB_X: u64 = 0x0C;
    pub const SUB_Y: u64 = 0x10;
}

/// Sub-tile units per whole tile.
pub const TILE_SCALE: i32 = 65536;

/// Field offsets inside the cell context handed to draw routines.
#[derive(Debug, Clone, Copy)]
pub struct CellContextLayout {
    pub unit_id: u64,
    pub unit_kind: u64,
    pub unit_token: u64,
    pub unit_mode: u64,
}

pub const CELL_V109: CellContextLayout = CellContextLayout {
    unit_id: 0x24,
    unit_kind: 0x28,
    unit_token: 0x2C,
    unit_mode: 0x30,
};

pub const CELL_V112: CellContextLayout = CellContextLayout {
    unit_id: 0x40,
    unit_kind: 0x44,
    unit_token: 0x48,
    unit_mode: 0x4C,
};

pub const CELL_V113: CellContextLayout = CellContextLayout {
    unit_id: 0x48,
    unit_kind: 0x4C,
    unit_token: 0x50,
    unit_mode: 0x54,
};

impl CellContextLayout {
    pub fn for_version(version: GameVersion) -> Option<&'static CellContextLayout> {
        match version {
            GameVersion::Lod109d | GameVersion::Lod110f => Some(&CELL_V109),
            GameVersion::Lod112 => Some(&CELL_V112),
            GameVersion::Lod113c | GameVersion::Lod113d | GameVersion::Lod114d => {
                Some(&CELL_V113)
            }
            GameVersion::Unsupported => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_layout_selection() {
        assert_eq!(
            UnitLayout::for_version(GameVersion::Lod109d).unwrap().path,
            0x28
        );
        assert_eq!(
            UnitLayout::for_version(GameVersion::Lod113d).unwrap().path,
            0x2C
        );
        assert!(UnitLayout::for_version(GameVersion::Unsupported).is_none());
    }

    #[test]
    fn test_cell_layout_selection() {
        assert_eq!(
            CellContextLayout::for_version(GameVersion::Lod110f)
                .unwrap()
                .unit_id,
            0x24
        );
        assert_eq!(
            CellContextLayout::for_version(GameVersion::Lod114d)
                .unwrap()
                .unit_id,
            0x48
        );
        assert!(CellContextLayout::for_version(GameVersion::Unsupported).is_none());
    }
}
