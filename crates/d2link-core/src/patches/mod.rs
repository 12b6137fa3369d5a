//! Frame-pacing patches.
//!
//! Each supported build carries a handful of in-place code patches that lift
//! the renderer's frame cap and remove sleep calls from the render loop. A
//! patch group only ever applies when every probe sees the exact expected
//! bytes, so a build that was already modified by something else is left
//! alone rather than corrupted.
//!
//! Patch offsets for the fps fixes come from The Phrozen Keep
//! (https://d2mods.info/forum/viewtopic.php?t=65239); the menu fps lead is
//! from D2Tweaks (https://github.com/Revan600/d2tweaks/).

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::memory::PatchMemory;
use crate::module::{GameModule, ModuleMap};
use crate::version::GameVersion;

use GameModule::{D2Client, D2Win, Game};
use GameVersion::*;

const NOPS: u32 = 0x9090_9090;

/// One atomic patch group: all probes must match before any write lands.
#[derive(Debug, Clone, Copy)]
pub struct PatchSpec {
    pub module: GameModule,
    pub probes: &'static [(u64, u32)],
    pub writes: &'static [(u64, u32)],
}

fn in_game_fps_patches(version: GameVersion) -> Option<&'static [PatchSpec]> {
    Some(match version {
        Lod109d => &[PatchSpec {
            module: D2Client,
            probes: &[(0x9B63, 0x2B75_6FBB)],
            writes: &[(0x9B5F, NOPS), (0x9B63, NOPS)],
        }],
        Lod110f => &[PatchSpec {
            module: D2Client,
            probes: &[(0xA2C9, 0x2B75_C085)],
            writes: &[(0xA2C9, NOPS)],
        }],
        Lod112 => &[PatchSpec {
            module: D2Client,
            probes: &[(0x7D1E5, 0x3575_6FBD)],
            writes: &[(0x7D1E1, NOPS), (0x7D1E5, NOPS)],
        }],
        Lod113c => &[PatchSpec {
            module: D2Client,
            probes: &[(0x44E4D, 0xFFFC_8455)],
            writes: &[(0x44E51, NOPS), (0x44E55, NOPS)],
        }],
        Lod113d => &[PatchSpec {
            module: D2Client,
            probes: &[(0x45E9D, 0xFFFC_738B)],
            writes: &[(0x45EA1, NOPS), (0x45EA5, NOPS)],
        }],
        Lod114d => &[PatchSpec {
            module: Game,
            probes: &[(0x4F274, 0x000C_6A68)],
            writes: &[(0x4F278, NOPS), (0x4F27C, NOPS)],
        }],
        Unsupported => return None,
    })
}

fn menu_fps_patches(version: GameVersion) -> Option<&'static [PatchSpec]> {
    Some(match version {
        Lod109d => &[PatchSpec {
            module: D2Win,
            probes: &[(0xEC0C, 0x5051_196A)],
            writes: &[(0xEC0C, 0x5051_7F6A)],
        }],
        Lod110f => &[PatchSpec {
            module: D2Win,
            probes: &[(0xD029, 0x8128_C783)],
            writes: &[(0xD029, 0x8190_9090)],
        }],
        Lod112 => &[PatchSpec {
            module: D2Win,
            probes: &[(0xD949, 0x8128_C783)],
            writes: &[(0xD949, 0x8190_9090)],
        }],
        Lod113c => &[PatchSpec {
            module: D2Win,
            probes: &[(0x18A19, 0x8128_C783)],
            writes: &[(0x18A19, 0x8190_9090)],
        }],
        Lod113d => &[PatchSpec {
            module: D2Win,
            probes: &[(0xED69, 0x8128_C783)],
            writes: &[(0xED69, 0x8190_9090)],
        }],
        Lod114d => &[PatchSpec {
            module: Game,
            probes: &[(0xFA62B, 0x8128_C783)],
            writes: &[(0xFA62B, 0x8190_9090)],
        }],
        Unsupported => return None,
    })
}

fn sleep_patches(version: GameVersion) -> Option<&'static [PatchSpec]> {
    Some(match version {
        Lod110f => &[
            PatchSpec {
                module: D2Client,
                probes: &[(0x2684, 0x15FF_0A6A)],
                writes: &[(0x2684, NOPS), (0x2688, NOPS)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x9E68, 0x83D7_FF53)],
                writes: &[(0x9E68, 0x8390_9090)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x9E8C, 0x83D7_FF53)],
                writes: &[(0x9E8C, 0x8390_9090)],
            },
        ],
        Lod112 => &[
            PatchSpec {
                module: D2Client,
                probes: &[(0x6CFD4, 0x15FF_0A6A)],
                writes: &[(0x6CFD4, NOPS)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x6CFD8, 0x6FB7_EF7C)],
                writes: &[(0x6CFD8, NOPS)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x7BD18, 0xD3FF_006A)],
                writes: &[(0x7BD18, NOPS)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x7BD3D, 0xD3FF_006A)],
                writes: &[(0x7BD3D, NOPS)],
            },
        ],
        Lod113c => &[
            // The call spans two words; both must look untouched.
            PatchSpec {
                module: D2Win,
                probes: &[(0x18A63, 0xC815_FF50), (0x18A67, 0xA16F_8FB2)],
                writes: &[(0x18A63, NOPS), (0x18A67, 0xA190_9090)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x3CB92, 0x0A6A_0874)],
                writes: &[(0x3CB92, 0x0A6A_08EB)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x43988, 0xD3FF_006A)],
                writes: &[(0x43988, NOPS)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x439AD, 0xD3FF_006A)],
                writes: &[(0x439AD, NOPS)],
            },
        ],
        Lod113d => &[
            PatchSpec {
                module: D2Win,
                probes: &[(0xEDB3, 0xB815_FF50)],
                writes: &[(0xEDB3, NOPS)],
            },
            PatchSpec {
                module: D2Win,
                probes: &[(0xEDB7, 0xA16F_8FB2)],
                writes: &[(0xEDB7, 0xA190_9090)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x27724, 0x15FF_0A6A)],
                writes: &[(0x27724, NOPS)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x27728, 0x6FB7_FF6C)],
                writes: &[(0x27728, NOPS)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x4494D, 0xD3FF_006A)],
                writes: &[(0x4494D, NOPS)],
            },
            PatchSpec {
                module: D2Client,
                probes: &[(0x44928, 0xD3FF_006A)],
                writes: &[(0x44928, NOPS)],
            },
        ],
        Lod114d => &[
            PatchSpec {
                module: Game,
                probes: &[(0x51C42, 0x15FF_0A6A)],
                writes: &[(0x51C42, NOPS)],
            },
            PatchSpec {
                module: Game,
                probes: &[(0x51C46, 0x006C_C258)],
                writes: &[(0x51C46, NOPS)],
            },
            PatchSpec {
                module: Game,
                probes: &[(0x4C711, 0xD7FF_006A)],
                writes: &[(0x4C711, NOPS)],
            },
            PatchSpec {
                module: Game,
                probes: &[(0x4C740, 0xD7FF_006A)],
                writes: &[(0x4C740, NOPS)],
            },
        ],
        Lod109d | Unsupported => return None,
    })
}

fn apply_groups<M: PatchMemory>(
    name: &str,
    specs: &[PatchSpec],
    modules: &ModuleMap,
    memory: &M,
) -> Result<()> {
    for spec in specs {
        let base = modules
            .base(spec.module)
            .ok_or_else(|| Error::ModuleNotLoaded(spec.module.display_name().to_string()))?;

        let matched = spec
            .probes
            .iter()
            .all(|&(offset, expected)| memory.probe_u32(base + offset, expected));
        if !matched {
            warn!(
                "{}: code at {} does not look as expected, leaving it alone",
                name,
                spec.module.display_name()
            );
            continue;
        }

        for &(offset, value) in spec.writes {
            memory.patch_u32(base + offset, value)?;
        }
    }
    info!("{} applied", name);
    Ok(())
}

/// Remove the in-game frame cap.
pub fn apply_in_game_fps_fix<M: PatchMemory>(
    version: GameVersion,
    modules: &ModuleMap,
    memory: &M,
) -> Result<()> {
    let specs = in_game_fps_patches(version).ok_or(Error::UnsupportedVersion)?;
    apply_groups("In-game fps fix", specs, modules, memory)
}

/// Remove the menu frame cap.
pub fn apply_menu_fps_fix<M: PatchMemory>(
    version: GameVersion,
    modules: &ModuleMap,
    memory: &M,
) -> Result<()> {
    let specs = menu_fps_patches(version).ok_or(Error::UnsupportedVersion)?;
    apply_groups("Menu fps fix", specs, modules, memory)
}

/// Remove sleep calls from the in-game render loop.
pub fn apply_sleep_fixes<M: PatchMemory>(
    version: GameVersion,
    modules: &ModuleMap,
    memory: &M,
) -> Result<()> {
    let specs = sleep_patches(version).ok_or(Error::UnsupportedVersion)?;
    apply_groups("Sleep fixes", specs, modules, memory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MockMemory, ReadMemory};
    use crate::module::ModuleHandle;

    const BASE: u64 = 0x6FAB_0000;

    fn fixture(module: GameModule) -> (ModuleMap, MockMemory) {
        let memory = MockMemory::zeroed(BASE, 0x10_0000);
        let mut modules = ModuleMap::new();
        modules.insert(module, ModuleHandle::new(BASE, 0x10_0000));
        (modules, memory)
    }

    #[test]
    fn test_fps_fix_applies_when_probe_matches() {
        let (modules, memory) = fixture(GameModule::D2Client);
        memory.set_u32(BASE + 0x44E4D, 0xFFFC_8455);
        memory.set_u32(BASE + 0x44E51, 0x1111_1111);
        memory.set_u32(BASE + 0x44E55, 0x2222_2222);

        apply_in_game_fps_fix(GameVersion::Lod113c, &modules, &memory).unwrap();

        assert_eq!(memory.read_u32(BASE + 0x44E51).unwrap(), NOPS);
        assert_eq!(memory.read_u32(BASE + 0x44E55).unwrap(), NOPS);
        // The probed word itself is not a write target on 1.13c.
        assert_eq!(memory.read_u32(BASE + 0x44E4D).unwrap(), 0xFFFC_8455);
    }

    #[test]
    fn test_failed_probe_leaves_memory_unchanged() {
        let (modules, memory) = fixture(GameModule::D2Client);
        memory.set_u32(BASE + 0x44E4D, 0xAAAA_AAAA);
        memory.set_u32(BASE + 0x44E51, 0x1111_1111);

        apply_in_game_fps_fix(GameVersion::Lod113c, &modules, &memory).unwrap();

        assert_eq!(memory.read_u32(BASE + 0x44E51).unwrap(), 0x1111_1111);
    }

    #[test]
    fn test_double_probe_is_all_or_nothing() {
        let (mut modules, memory) = fixture(GameModule::D2Win);
        modules.insert(GameModule::D2Client, ModuleHandle::new(BASE, 0x10_0000));
        // First probe word matches, second does not.
        memory.set_u32(BASE + 0x18A63, 0xC815_FF50);
        memory.set_u32(BASE + 0x18A67, 0xFFFF_FFFF);

        apply_sleep_fixes(GameVersion::Lod113c, &modules, &memory).unwrap();

        assert_eq!(memory.read_u32(BASE + 0x18A63).unwrap(), 0xC815_FF50);
        assert_eq!(memory.read_u32(BASE + 0x18A67).unwrap(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_independent_groups_apply_separately() {
        let (modules, memory) = fixture(GameModule::D2Client);
        // Only the second 1.10 sleep group matches.
        memory.set_u32(BASE + 0x9E68, 0x83D7_FF53);

        apply_sleep_fixes(GameVersion::Lod110f, &modules, &memory).unwrap();

        assert_eq!(memory.read_u32(BASE + 0x9E68).unwrap(), 0x8390_9090);
        assert_eq!(memory.read_u32(BASE + 0x2684).unwrap(), 0);
        assert_eq!(memory.read_u32(BASE + 0x9E8C).unwrap(), 0);
    }

    #[test]
    fn test_unsupported_versions_error() {
        let (modules, memory) = fixture(GameModule::D2Client);
        assert!(matches!(
            apply_in_game_fps_fix(GameVersion::Unsupported, &modules, &memory),
            Err(Error::UnsupportedVersion)
        ));
        // 1.09 never had sleep patches.
        assert!(matches!(
            apply_sleep_fixes(GameVersion::Lod109d, &modules, &memory),
            Err(Error::UnsupportedVersion)
        ));
    }

    #[test]
    fn test_missing_module_errors() {
        let memory = MockMemory::zeroed(BASE, 0x100);
        let modules = ModuleMap::new();
        assert!(matches!(
            apply_menu_fps_fix(GameVersion::Lod113c, &modules, &memory),
            Err(Error::ModuleNotLoaded(_))
        ));
    }
}
