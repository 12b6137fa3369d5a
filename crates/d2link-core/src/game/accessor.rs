//! Version-indexed field and value accessors.
//!
//! One accessor instance wraps the resolved version, the module snapshot and
//! a memory reader, and answers every abstract request ("unit kind", "menu
//! open") by selecting the concrete location for that version. Every path
//! fails closed: an unsupported version, an absent module or an unreadable
//! pointer yields `None`/zero/false, never a fault.

use tracing::debug;

use crate::game::layout::{self, CellContextLayout, TILE_SCALE, UnitLayout};
use crate::game::{DrawParameters, Position, UnitKind};
use crate::memory::ReadMemory;
use crate::module::{GameModule, ModuleMap};
use crate::version::GameVersion;

use GameModule::{D2Client, Game};
use GameVersion::*;

pub struct GameAccessor<'a, R: ReadMemory> {
    version: GameVersion,
    modules: &'a ModuleMap,
    reader: &'a R,
}

impl<'a, R: ReadMemory> GameAccessor<'a, R> {
    pub fn new(version: GameVersion, modules: &'a ModuleMap, reader: &'a R) -> Self {
        Self {
            version,
            modules,
            reader,
        }
    }

    pub fn version(&self) -> GameVersion {
        self.version
    }

    fn value_address(&self, location: Option<(GameModule, u64)>) -> Option<u64> {
        let (module, offset) = location?;
        Some(self.modules.base(module)? + offset)
    }

    fn read_value_u32(&self, location: Option<(GameModule, u64)>) -> Option<u32> {
        let address = self.value_address(location)?;
        self.reader.read_u32(address).ok()
    }

    /// The game's screen-open mode word (which side panels are open).
    pub fn screen_open_mode(&self) -> u32 {
        self.read_value_u32(screen_mode_location(self.version))
            .unwrap_or(0)
    }

    /// Whether the in-game escape menu is open.
    pub fn is_menu_open(&self) -> bool {
        self.read_value_u32(menu_open_location(self.version))
            .is_some_and(|value| value != 0)
    }

    /// Whether a game session is running (as opposed to the out-of-game
    /// menus). Combines the in-game flag with a live player unit where the
    /// version exposes one through a readable global.
    pub fn is_in_game(&self) -> bool {
        let flag = self
            .read_value_u32(in_game_flag_location(self.version))
            .is_some_and(|value| value != 0);
        if !flag {
            return false;
        }

        match player_unit_location(self.version) {
            Some(location) => match self.read_value_u32(Some(location)) {
                Some(unit) if unit != 0 => self.unit_path_pointer(u64::from(unit)).is_some(),
                _ => false,
            },
            // 1.09/1.10 reach the player through a game function instead of
            // a global; the flag alone decides there.
            None => true,
        }
    }

    /// Address of the local player's unit, `None` where the version keeps it
    /// behind a function rather than a global.
    pub fn player_unit(&self) -> Option<u64> {
        let unit = self.read_value_u32(Some(player_unit_location(self.version)?))?;
        (unit != 0).then_some(u64::from(unit))
    }

    /// Act the local player is currently in.
    pub fn current_act(&self) -> Option<u32> {
        let unit = self.player_unit()?;
        self.unit_act(unit)
    }

    /// Kind discriminant of a unit.
    pub fn unit_kind(&self, unit: u64) -> Option<UnitKind> {
        let unit_layout = UnitLayout::for_version(self.version)?;
        let raw = self.reader.read_u32(unit + unit_layout.kind).ok()?;
        let kind = UnitKind::from_u32(raw);
        if kind.is_none() {
            debug!("Unit at {:#x} has unknown kind {}", unit, raw);
        }
        kind
    }

    /// Unit identifier.
    pub fn unit_id(&self, unit: u64) -> Option<u32> {
        let unit_layout = UnitLayout::for_version(self.version)?;
        self.reader.read_u32(unit + unit_layout.unit_id).ok()
    }

    /// Act a unit belongs to.
    pub fn unit_act(&self, unit: u64) -> Option<u32> {
        let unit_layout = UnitLayout::for_version(self.version)?;
        self.reader.read_u32(unit + unit_layout.act).ok()
    }

    fn unit_path_pointer(&self, unit: u64) -> Option<u64> {
        let unit_layout = UnitLayout::for_version(self.version)?;
        let path = self.reader.read_ptr32(unit + unit_layout.path).ok()?;
        (path != 0).then_some(path)
    }

    /// Position of a unit in native sub-tile resolution.
    ///
    /// Moving units carry native coordinates on their live path; stationary
    /// units store whole tiles plus a sub-tile remainder which is
    /// reconstructed as `tile * 65536 + sub` per axis.
    pub fn unit_position(&self, unit: u64) -> Option<Position> {
        let kind = self.unit_kind(unit)?;
        let path = self.unit_path_pointer(unit)?;

        if kind.is_moving() {
            let x = self.reader.read_i32(path + layout::path::X).ok()?;
            let y = self.reader.read_i32(path + layout::path::Y).ok()?;
            Some(Position::new(x, y))
        } else {
            let tile_x = self.reader.read_i32(path + layout::static_path::TILE_X).ok()?;
            let tile_y = self.reader.read_i32(path + layout::static_path::TILE_Y).ok()?;
            let sub_x = self.reader.read_i32(path + layout::static_path::SUB_X).ok()?;
            let sub_y = self.reader.read_i32(path + layout::static_path::SUB_Y).ok()?;
            Some(Position::new(
                tile_x * TILE_SCALE + sub_x,
                tile_y * TILE_SCALE + sub_y,
            ))
        }
    }

    /// Draw parameters out of the cell context handed to a draw routine.
    pub fn draw_parameters(&self, cell_context: u64) -> Option<DrawParameters> {
        let cell = CellContextLayout::for_version(self.version)?;
        Some(DrawParameters {
            unit_id: self.reader.read_u32(cell_context + cell.unit_id).ok()?,
            unit_kind: self.reader.read_u32(cell_context + cell.unit_kind).ok()?,
            unit_token: self.reader.read_u32(cell_context + cell.unit_token).ok()?,
            unit_mode: self.reader.read_u32(cell_context + cell.unit_mode).ok()?,
        })
    }
}

fn screen_mode_location(version: GameVersion) -> Option<(GameModule, u64)> {
    match version {
        Lod109d => Some((D2Client, 0x115C10)),
        Lod110f => Some((D2Client, 0x10B9C4)),
        Lod112 => Some((D2Client, 0x11C1D0)),
        Lod113c => Some((D2Client, 0x11C414)),
        Lod113d => Some((D2Client, 0x11D070)),
        Lod114d => Some((Game, 0x3A5210)),
        Unsupported => None,
    }
}

fn menu_open_location(version: GameVersion) -> Option<(GameModule, u64)> {
    match version {
        Lod109d => Some((D2Client, 0x1248D8)),
        Lod110f => Some((D2Client, 0x11A6CC)),
        Lod112 => Some((D2Client, 0x102B7C)),
        Lod113c => Some((D2Client, 0xFADA4)),
        Lod113d => Some((D2Client, 0x11C8B4)),
        Lod114d => Some((Game, 0x3A27E4)),
        Unsupported => None,
    }
}

fn in_game_flag_location(version: GameVersion) -> Option<(GameModule, u64)> {
    match version {
        Lod109d => Some((D2Client, 0x1109FC)),
        Lod110f => Some((D2Client, 0x1077C4)),
        Lod112 => Some((D2Client, 0x11BCC4)),
        Lod113c => Some((D2Client, 0xF8C9C)),
        Lod113d => Some((D2Client, 0xF79E0)),
        Lod114d => Some((Game, 0x3A27C0)),
        Unsupported => None,
    }
}

fn player_unit_location(version: GameVersion) -> Option<(GameModule, u64)> {
    match version {
        Lod112 => Some((D2Client, 0x11C3D0)),
        Lod113c => Some((D2Client, 0x11BBFC)),
        Lod113d => Some((D2Client, 0x11D050)),
        Lod114d => Some((Game, 0x3A6A70)),
        // 1.09/1.10 call into D2Client for the player unit.
        Lod109d | Lod110f | Unsupported => None,
    }
}
