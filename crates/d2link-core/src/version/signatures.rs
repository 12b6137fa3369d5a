//! Static entry-point signatures for every supported build.
//!
//! For each dependent DLL, the `AddressOfEntryPoint` it carries in each
//! supported release. The values are fixed per release build and collected
//! externally; identical values across versions are real (several DLLs did
//! not change between patches) and are what makes the match *counting*
//! necessary in the first place.

use crate::module::GameModule;
use crate::version::GameVersion;

use GameVersion::{Lod109d, Lod110f, Lod112, Lod113c, Lod113d};

/// Expected entry points for one module across the classic (multi-DLL)
/// versions.
#[derive(Debug, Clone, Copy)]
pub struct EntryPointSignature {
    pub module: GameModule,
    pub expected: &'static [(GameVersion, u32)],
}

/// A classic version must match at least this many DLL entry points to be
/// selected.
pub const MINIMUM_MODULE_MATCHES: usize = 7;

/// Game.exe entry point of the 1.14d build. A match here takes unconditional
/// precedence: 1.14 ships without the classic DLL set, so the counted
/// signatures below cannot reach the threshold for it.
pub const GAME_EXE_114D_ENTRY_POINT: u32 = 0x0028_2985;

pub const DLL_SIGNATURES: &[EntryPointSignature] = &[
    EntryPointSignature {
        module: GameModule::D2Client,
        expected: &[
            (Lod109d, 0x000C_16CD),
            (Lod110f, 0x000C_1C1D),
            (Lod112, 0x0000_45FA),
            (Lod113c, 0x0000_45F6),
            (Lod113d, 0x0000_45DE),
        ],
    },
    EntryPointSignature {
        module: GameModule::D2Cmp,
        expected: &[
            (Lod109d, 0x0001_1361),
            (Lod110f, 0x0001_0E61),
            (Lod112, 0x0000_2C23),
            (Lod113c, 0x0000_2C23),
            (Lod113d, 0x0000_2C23),
        ],
    },
    EntryPointSignature {
        module: GameModule::D2Common,
        expected: &[
            (Lod109d, 0x0007_4E2D),
            (Lod110f, 0x0008_56DD),
            (Lod112, 0x0000_2C97),
            (Lod113c, 0x0000_2C8F),
            (Lod113d, 0x0000_47C7),
        ],
    },
    EntryPointSignature {
        module: GameModule::D2Game,
        expected: &[
            (Lod109d, 0x000C_6D5C),
            (Lod110f, 0x000E_DC2C),
            (Lod112, 0x0000_374B),
            (Lod113c, 0x0000_373C),
            (Lod113d, 0x0000_3747),
        ],
    },
    EntryPointSignature {
        module: GameModule::D2Gfx,
        expected: &[
            (Lod109d, 0x0000_54EB),
            (Lod110f, 0x0000_54A5),
            (Lod112, 0x0000_1807),
            (Lod113c, 0x0000_1807),
            (Lod113d, 0x0000_1807),
        ],
    },
    EntryPointSignature {
        module: GameModule::D2Lang,
        expected: &[
            (Lod109d, 0x0000_5138),
            (Lod110f, 0x0000_5048),
            (Lod112, 0x0000_1A75),
            (Lod113c, 0x0000_1A71),
            (Lod113d, 0x0000_1A5A),
        ],
    },
    EntryPointSignature {
        module: GameModule::D2Launch,
        expected: &[
            (Lod109d, 0x0001_7243),
            (Lod110f, 0x0001_8DC7),
            (Lod112, 0x0000_1A85),
            (Lod113c, 0x0000_1A87),
            (Lod113d, 0x0000_1A84),
        ],
    },
    EntryPointSignature {
        module: GameModule::D2Net,
        expected: &[
            (Lod109d, 0x0000_2BCE),
            (Lod110f, 0x0000_2C6E),
            (Lod112, 0x0000_167E),
            (Lod113c, 0x0000_1676),
            (Lod113d, 0x0000_167E),
        ],
    },
    EntryPointSignature {
        module: GameModule::D2Win,
        expected: &[
            (Lod109d, 0x0001_4F38),
            (Lod110f, 0x0001_2EC0),
            (Lod112, 0x0000_188E),
            (Lod113c, 0x0000_187E),
            (Lod113d, 0x0000_1887),
        ],
    },
    EntryPointSignature {
        module: GameModule::Fog,
        expected: &[
            (Lod109d, 0x0001_42E7),
            (Lod110f, 0x0001_62B0),
            (Lod112, 0x0000_314A),
            (Lod113c, 0x0000_3162),
            (Lod113d, 0x0000_3142),
        ],
    },
    EntryPointSignature {
        module: GameModule::Storm,
        expected: &[
            (Lod109d, 0x0001_42E7),
            (Lod110f, 0x0001_62B0),
            (Lod112, 0x0000_314A),
            (Lod113c, 0x0000_3162),
            (Lod113d, 0x0003_C3E0),
        ],
    },
];

impl EntryPointSignature {
    /// Versions whose expected entry point for this module equals `observed`.
    pub fn matching_versions(&self, observed: u32) -> impl Iterator<Item = GameVersion> + '_ {
        self.expected
            .iter()
            .filter(move |(_, expected)| *expected == observed)
            .map(|(version, _)| *version)
    }
}
