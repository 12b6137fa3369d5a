//! Build fingerprinting from loaded module headers.
//!
//! Each present DLL's entry point is compared against every version's
//! expected value; a version is selected once it accumulates
//! [`MINIMUM_MODULE_MATCHES`] matches. The per-module diagnostics (preferred
//! base, load address, path) are advisory output only and never influence the
//! result.

use tracing::{debug, info, warn};

use crate::module::{GameModule, ModuleMap};
use crate::memory::ReadMemory;
use crate::pe::{ImageHeader, read_image_header};
use crate::version::{
    DLL_SIGNATURES, GAME_EXE_114D_ENTRY_POINT, GameVersion, MINIMUM_MODULE_MATCHES,
};

/// Advisory per-module observation captured during fingerprinting.
#[derive(Debug, Clone)]
pub struct ModuleObservation {
    pub module: GameModule,
    pub load_address: u64,
    pub preferred_base: u32,
    pub entry_point: u32,
    pub path: Option<String>,
    pub relocated: bool,
}

/// Result of a fingerprint pass: the resolved version plus everything that
/// was observed along the way.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub version: GameVersion,
    pub observations: Vec<ModuleObservation>,
}

/// Inspect every present module and resolve the loaded game build.
///
/// Deterministic, single pass, no retries. Returns
/// [`GameVersion::Unsupported`] when no version reaches the match threshold.
pub fn fingerprint<R: ReadMemory>(modules: &ModuleMap, reader: &R) -> Fingerprint {
    let mut counts = [0usize; GameVersion::SUPPORTED.len()];
    let mut observations = Vec::new();

    for signature in DLL_SIGNATURES {
        let Some(handle) = modules.get(signature.module) else {
            continue;
        };
        let Some(header) = read_image_header(reader, handle) else {
            // Header unreadable or malformed: module treated as absent.
            warn!("{}: image header unreadable", signature.module.display_name());
            continue;
        };

        for version in signature.matching_versions(header.entry_point) {
            counts[version_index(version)] += 1;
        }

        observations.push(observe(signature.module, handle.base, &header, handle));
    }

    // The 1.14 family is one self-contained executable; its check stands
    // alone and, when it hits, overrides whatever the DLL counts said.
    let mut exe_is_114d = false;
    if let Some(handle) = modules.get(GameModule::Game) {
        if let Some(header) = read_image_header(reader, handle) {
            exe_is_114d = header.entry_point == GAME_EXE_114D_ENTRY_POINT;
            observations.push(observe(GameModule::Game, handle.base, &header, handle));
        }
    }

    // Diagnostics only; module presence is interesting even without a header.
    if let Some(handle) = modules.get(GameModule::D2Glide) {
        debug!(
            "{} present at {:#010x}",
            GameModule::D2Glide.display_name(),
            handle.base
        );
    }

    for observation in &observations {
        info!(
            "{}\tbase address {:#010x}, loaded at {:#010x}, entry point {:#010x}{}",
            observation.module.display_name(),
            observation.preferred_base,
            observation.load_address,
            observation.entry_point,
            if observation.relocated { " (relocated)" } else { "" },
        );
    }

    let mut version = GameVersion::Unsupported;
    for candidate in GameVersion::SUPPORTED {
        if candidate.is_single_module() {
            continue;
        }
        let count = counts[version_index(candidate)];
        debug!("{}: {} module matches", candidate, count);
        if count >= MINIMUM_MODULE_MATCHES {
            version = candidate;
        }
    }

    if exe_is_114d {
        version = GameVersion::Lod114d;
    }

    match version {
        GameVersion::Unsupported => warn!("No known game version matched"),
        v => info!("Detected game version: {}", v),
    }

    Fingerprint {
        version,
        observations,
    }
}

fn observe(
    module: GameModule,
    load_address: u64,
    header: &ImageHeader,
    handle: &crate::module::ModuleHandle,
) -> ModuleObservation {
    ModuleObservation {
        module,
        load_address,
        preferred_base: header.preferred_base,
        entry_point: header.entry_point,
        path: handle
            .path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        relocated: u64::from(header.preferred_base) != load_address,
    }
}

fn version_index(version: GameVersion) -> usize {
    GameVersion::SUPPORTED
        .iter()
        .position(|v| *v == version)
        .expect("supported version")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemory;
    use crate::module::ModuleHandle;
    use crate::pe::testing::write_pe_header;
    use crate::version::DLL_SIGNATURES;

    /// Build a module map plus backing memory where the first `count`
    /// signature modules carry `version`'s expected entry point.
    fn fixture(version: GameVersion, count: usize) -> (ModuleMap, Vec<MockMemory>) {
        let mut map = ModuleMap::new();
        let mut memories = Vec::new();

        for (i, signature) in DLL_SIGNATURES.iter().take(count).enumerate() {
            let base = 0x6F00_0000 + (i as u64) * 0x0010_0000;
            let memory = MockMemory::zeroed(base, 0x200);
            let expected = signature
                .expected
                .iter()
                .find(|(v, _)| *v == version)
                .map(|(_, ep)| *ep)
                .unwrap();
            write_pe_header(&memory, expected, base as u32);
            map.insert(signature.module, ModuleHandle::new(base, 0x200));
            memories.push(memory);
        }

        (map, memories)
    }

    struct Composite(Vec<MockMemory>);

    impl ReadMemory for Composite {
        fn read_bytes(&self, address: u64, len: usize) -> crate::error::Result<Vec<u8>> {
            for memory in &self.0 {
                if let Ok(bytes) = memory.read_bytes(address, len) {
                    return Ok(bytes);
                }
            }
            Err(crate::error::Error::MemoryReadFailed {
                address,
                message: "no region".to_string(),
            })
        }
    }

    #[test]
    fn test_full_match_resolves_version() {
        for version in [GameVersion::Lod109d, GameVersion::Lod110f, GameVersion::Lod113d] {
            let (map, memories) = fixture(version, DLL_SIGNATURES.len());
            let result = fingerprint(&map, &Composite(memories));
            assert_eq!(result.version, version);
            assert_eq!(result.observations.len(), DLL_SIGNATURES.len());
        }
    }

    #[test]
    fn test_exactly_threshold_matches() {
        let (map, memories) = fixture(GameVersion::Lod113c, MINIMUM_MODULE_MATCHES);
        let result = fingerprint(&map, &Composite(memories));
        assert_eq!(result.version, GameVersion::Lod113c);
    }

    #[test]
    fn test_below_threshold_is_unsupported() {
        let (map, memories) = fixture(GameVersion::Lod113c, MINIMUM_MODULE_MATCHES - 1);
        let result = fingerprint(&map, &Composite(memories));
        assert_eq!(result.version, GameVersion::Unsupported);
    }

    #[test]
    fn test_no_modules_is_unsupported() {
        let result = fingerprint(&ModuleMap::new(), &Composite(Vec::new()));
        assert_eq!(result.version, GameVersion::Unsupported);
        assert!(result.observations.is_empty());
    }

    #[test]
    fn test_garbage_headers_are_ignored() {
        let mut map = ModuleMap::new();
        let memory = MockMemory::zeroed(0x6F00_0000, 0x200);
        map.insert(GameModule::D2Client, ModuleHandle::new(0x6F00_0000, 0x200));

        let result = fingerprint(&map, &Composite(vec![memory]));
        assert_eq!(result.version, GameVersion::Unsupported);
    }

    #[test]
    fn test_114d_short_circuit_beats_counted_matches() {
        // A full 1.13c DLL match plus a 1.14d Game.exe: the dedicated exe
        // check wins.
        let (mut map, mut memories) = fixture(GameVersion::Lod113c, DLL_SIGNATURES.len());

        let exe = MockMemory::zeroed(0x0040_0000, 0x200);
        write_pe_header(&exe, GAME_EXE_114D_ENTRY_POINT, 0x0040_0000);
        map.insert(GameModule::Game, ModuleHandle::new(0x0040_0000, 0x200));
        memories.push(exe);

        let result = fingerprint(&map, &Composite(memories));
        assert_eq!(result.version, GameVersion::Lod114d);
    }

    #[test]
    fn test_game_exe_with_other_entry_point_does_not_match() {
        let mut map = ModuleMap::new();
        let exe = MockMemory::zeroed(0x0040_0000, 0x200);
        write_pe_header(&exe, 0x0029_1342, 0x0040_0000); // 1.14a, unsupported
        map.insert(GameModule::Game, ModuleHandle::new(0x0040_0000, 0x200));

        let result = fingerprint(&map, &Composite(vec![exe]));
        assert_eq!(result.version, GameVersion::Unsupported);
    }

    #[test]
    fn test_relocation_flagged_in_observations() {
        let (mut map, mut memories) = fixture(GameVersion::Lod112, DLL_SIGNATURES.len());

        // Relocate one module: header still claims its preferred base.
        let base = 0x7000_0000u64;
        let memory = MockMemory::zeroed(base, 0x200);
        let d2win = DLL_SIGNATURES
            .iter()
            .find(|s| s.module == GameModule::D2Win)
            .unwrap();
        let ep = d2win
            .expected
            .iter()
            .find(|(v, _)| *v == GameVersion::Lod112)
            .unwrap()
            .1;
        write_pe_header(&memory, ep, 0x6F8E_0000);
        map.insert(GameModule::D2Win, ModuleHandle::new(base, 0x200));
        memories.push(memory);

        let result = fingerprint(&map, &Composite(memories));
        assert_eq!(result.version, GameVersion::Lod112);
        let observation = result
            .observations
            .iter()
            .find(|o| o.module == GameModule::D2Win && o.load_address == base)
            .unwrap();
        assert!(observation.relocated);
    }
}
