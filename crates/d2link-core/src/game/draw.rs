//! Identification of the draw routine behind a draw call.
//!
//! When the render pipeline intercepts a draw, the return address on the
//! stack tells which game routine issued it. The known call sites are static
//! per version; an address outside the table is simply [`DrawRoutine::Unknown`].

use strum::{Display, IntoStaticStr};

use crate::version::GameVersion;

/// The game routine a draw call originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum DrawRoutine {
    Unknown,
    Wall1,
    Wall2,
    Floor,
    Shadow,
    Dynamic,
    Something1,
    Something2,
}

use DrawRoutine::*;
use GameVersion::*;

/// Known call-site return addresses for one version. Absolute addresses;
/// the classic DLLs load at fixed preferred bases.
fn call_sites(version: GameVersion) -> &'static [(DrawRoutine, u32)] {
    match version {
        Lod109d => &[
            (Wall1, 0x6F81_8468),
            (Wall2, 0x6F81_8476),
            (Floor, 0x6F81_3E2F),
            (Dynamic, 0x6F81_5EFB),
        ],
        Lod110f => &[
            (Wall1, 0x6F81_840C),
            (Wall2, 0x6F81_841A),
            (Floor, 0x6F81_3E24),
            (Dynamic, 0x6F81_5EC9),
        ],
        Lod112 => &[
            (Wall1, 0x6F85_A2F9),
            (Wall2, 0x6F85_A2EB),
            (Floor, 0x6F85_6D6C),
            (Dynamic, 0x6F85_87A4),
        ],
        Lod113c => &[
            (Wall1, 0x6F85_67AB),
            (Wall2, 0x6F85_67B9),
            (Floor, 0x6F85_BEFC),
            (Shadow, 0x0050_A995),
            (Dynamic, 0x6F85_A344),
            (Something1, 0x0050_C38D),
            (Something2, 0x0050_C0DE),
        ],
        Lod113d => &[
            (Wall1, 0x6F85_7199),
            (Wall2, 0x6F85_718B),
            (Floor, 0x6F85_C17C),
            (Shadow, 0x6F85_9EF5),
            (Dynamic, 0x6F85_9CE4),
            (Something1, 0x0050_C38D),
            (Something2, 0x0050_C0DE),
        ],
        Lod114d => &[
            (Wall1, 0x0050_D39F),
            (Wall2, 0x0050_D3AE),
            (Floor, 0x0050_DB03),
            (Shadow, 0x0050_A995),
            (Dynamic, 0x0050_ABDC),
            (Something1, 0x0050_C38D),
            (Something2, 0x0050_C0DE),
        ],
        Unsupported => &[],
    }
}

/// Identify the draw routine that returned to `return_address`.
pub fn identify_draw_routine(version: GameVersion, return_address: u32) -> DrawRoutine {
    call_sites(version)
        .iter()
        .find(|(_, address)| *address == return_address)
        .map(|(routine, _)| *routine)
        .unwrap_or(DrawRoutine::Unknown)
}
