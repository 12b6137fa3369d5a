//! Game build identification.

mod fingerprint;
mod report;
mod signatures;

pub use fingerprint::*;
pub use report::*;
pub use signatures::*;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// One supported build of the game, or [`GameVersion::Unsupported`].
///
/// Resolved once at attach time and immutable afterwards; everything
/// version-indexed keys off this value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
pub enum GameVersion {
    Lod109d,
    Lod110f,
    Lod112,
    Lod113c,
    Lod113d,
    Lod114d,
    Unsupported,
}

impl GameVersion {
    /// Supported versions in release order. Later entries win ties during
    /// fingerprinting, matching the original detection behaviour.
    pub const SUPPORTED: [GameVersion; 6] = [
        GameVersion::Lod109d,
        GameVersion::Lod110f,
        GameVersion::Lod112,
        GameVersion::Lod113c,
        GameVersion::Lod113d,
        GameVersion::Lod114d,
    ];

    pub fn is_supported(&self) -> bool {
        !matches!(self, GameVersion::Unsupported)
    }

    /// 1.14 builds fold every classic DLL into Game.exe.
    pub fn is_single_module(&self) -> bool {
        matches!(self, GameVersion::Lod114d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_flag() {
        assert!(GameVersion::Lod113c.is_supported());
        assert!(!GameVersion::Unsupported.is_supported());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(GameVersion::Lod109d.to_string(), "Lod109d");
        assert_eq!(GameVersion::Lod114d.to_string(), "Lod114d");
    }
}
