//! Top-level attachment to a running game.
//!
//! [`D2Link`] resolves the loaded build once at construction and afterwards
//! answers every version-dependent question through that resolution. The
//! whole object is read-mostly after attach; the only mutations it ever
//! performs are the explicit patch appliers.

use crate::error::Result;
use crate::game::{
    DrawParameters, DrawRoutine, ExportResolver, GameAccessor, GameFunction, Position, UnitKind,
    identify_draw_routine, resolve_function,
};
use crate::memory::{PatchMemory, ReadMemory};
use crate::module::{ModuleMap, ModuleProvider};
use crate::patches;
use crate::texture::{ClassificationIndex, TextureCategory, refine_category};
use crate::version::{Fingerprint, FingerprintReport, GameVersion, fingerprint};

/// Project Diablo 2 ships this extension DLL alongside the game.
const PD2_EXTENSION_MODULE: &str = "PD2_EXT.dll";

pub struct D2Link<R: ReadMemory> {
    modules: ModuleMap,
    fingerprint: Fingerprint,
    index: ClassificationIndex,
    project_diablo2: bool,
    reader: R,
}

impl<R: ReadMemory> D2Link<R> {
    /// Attach to the game visible through `provider`, reading through
    /// `reader`. Fingerprints once; the resolved version is fixed for the
    /// lifetime of the link.
    pub fn attach_with(provider: &impl ModuleProvider, reader: R) -> Self {
        let modules = ModuleMap::resolve(provider);
        let fingerprint = fingerprint(&modules, &reader);
        Self {
            modules,
            fingerprint,
            index: ClassificationIndex::build(),
            project_diablo2: provider.is_loaded(PD2_EXTENSION_MODULE),
            reader,
        }
    }

    pub fn version(&self) -> GameVersion {
        self.fingerprint.version
    }

    pub fn is_supported(&self) -> bool {
        self.version().is_supported()
    }

    pub fn modules(&self) -> &ModuleMap {
        &self.modules
    }

    /// Whether the Project Diablo 2 mod is present.
    pub fn is_project_diablo2(&self) -> bool {
        self.project_diablo2
    }

    /// Diagnostic report of the attach-time fingerprint pass.
    pub fn fingerprint_report(&self) -> FingerprintReport {
        FingerprintReport::from_fingerprint(&self.fingerprint)
    }

    fn accessor(&self) -> GameAccessor<'_, R> {
        GameAccessor::new(self.version(), &self.modules, &self.reader)
    }

    pub fn screen_open_mode(&self) -> u32 {
        self.accessor().screen_open_mode()
    }

    pub fn is_menu_open(&self) -> bool {
        self.accessor().is_menu_open()
    }

    pub fn is_in_game(&self) -> bool {
        self.accessor().is_in_game()
    }

    pub fn player_unit(&self) -> Option<u64> {
        self.accessor().player_unit()
    }

    pub fn current_act(&self) -> Option<u32> {
        self.accessor().current_act()
    }

    pub fn unit_kind(&self, unit: u64) -> Option<UnitKind> {
        self.accessor().unit_kind(unit)
    }

    pub fn unit_id(&self, unit: u64) -> Option<u32> {
        self.accessor().unit_id(unit)
    }

    pub fn unit_position(&self, unit: u64) -> Option<Position> {
        self.accessor().unit_position(unit)
    }

    pub fn draw_parameters(&self, cell_context: u64) -> Option<DrawParameters> {
        self.accessor().draw_parameters(cell_context)
    }

    /// Callable address for an abstract game function.
    pub fn function_address(
        &self,
        function: GameFunction,
        exports: &impl ExportResolver,
    ) -> Option<u64> {
        resolve_function(self.version(), function, &self.modules, exports)
    }

    /// Draw routine behind a return address observed on the stack.
    pub fn identify_draw_routine(&self, return_address: u32) -> DrawRoutine {
        identify_draw_routine(self.version(), return_address)
    }

    /// Category of a texture by content hash alone.
    pub fn texture_category(&self, hash: u32) -> TextureCategory {
        self.index.query(hash)
    }

    /// Category of a texture given its hash and the draw routine that
    /// submitted it.
    pub fn classify_texture(&self, hash: u32, routine: DrawRoutine) -> TextureCategory {
        refine_category(self.index.query(hash), routine)
    }
}

impl<R: PatchMemory> D2Link<R> {
    pub fn apply_in_game_fps_fix(&self) -> Result<()> {
        patches::apply_in_game_fps_fix(self.version(), &self.modules, &self.reader)
    }

    pub fn apply_menu_fps_fix(&self) -> Result<()> {
        patches::apply_menu_fps_fix(self.version(), &self.modules, &self.reader)
    }

    pub fn apply_sleep_fixes(&self) -> Result<()> {
        patches::apply_sleep_fixes(self.version(), &self.modules, &self.reader)
    }
}

#[cfg(target_os = "windows")]
impl D2Link<crate::memory::ProcessMemory> {
    /// Attach to the current process through the OS loader.
    pub fn attach() -> Self {
        Self::attach_with(
            &crate::module::LoaderModuleProvider::new(),
            crate::memory::ProcessMemory::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemory;
    use crate::module::{GameModule, ModuleHandle};
    use crate::pe::testing::write_pe_header_at;
    use crate::version::DLL_SIGNATURES;

    /// Provider backed by a single flat memory region holding synthetic
    /// 1.13c module images side by side.
    struct SyntheticGame {
        handles: Vec<(GameModule, ModuleHandle)>,
        pd2: bool,
    }

    fn synthetic_113c() -> (SyntheticGame, MockMemory) {
        const BASE: u64 = 0x6F00_0000;
        const STRIDE: u64 = 0x0010_0000;
        let memory = MockMemory::zeroed(BASE, DLL_SIGNATURES.len() * STRIDE as usize);

        let mut handles = Vec::new();
        for (i, signature) in DLL_SIGNATURES.iter().enumerate() {
            let module_base = BASE + (i as u64) * STRIDE;
            let entry_point = signature
                .expected
                .iter()
                .find(|(v, _)| *v == GameVersion::Lod113c)
                .unwrap()
                .1;
            write_pe_header_at(&memory, module_base, entry_point, module_base as u32);
            handles.push((
                signature.module,
                ModuleHandle::new(module_base, STRIDE),
            ));
        }
        (
            SyntheticGame {
                handles,
                pd2: false,
            },
            memory,
        )
    }

    impl ModuleProvider for SyntheticGame {
        fn module(&self, module: GameModule) -> Option<ModuleHandle> {
            self.handles
                .iter()
                .find(|(m, _)| *m == module)
                .map(|(_, handle)| handle.clone())
        }

        fn is_loaded(&self, file_name: &str) -> bool {
            self.pd2 && file_name.eq_ignore_ascii_case("PD2_EXT.dll")
        }
    }

    #[test]
    fn test_attach_resolves_version_once() {
        let (game, memory) = synthetic_113c();
        let link = D2Link::attach_with(&game, memory);

        assert_eq!(link.version(), GameVersion::Lod113c);
        assert!(link.is_supported());
        assert!(!link.is_project_diablo2());
        assert_eq!(link.modules().len(), DLL_SIGNATURES.len());
    }

    #[test]
    fn test_attach_unsupported_fails_closed() {
        let provider = SyntheticGame {
            handles: Vec::new(),
            pd2: false,
        };
        let memory = MockMemory::zeroed(0x1000, 0x100);
        let link = D2Link::attach_with(&provider, memory);

        assert_eq!(link.version(), GameVersion::Unsupported);
        assert_eq!(link.screen_open_mode(), 0);
        assert!(!link.is_in_game());
        assert_eq!(link.player_unit(), None);
        assert_eq!(
            link.identify_draw_routine(0x6F85_BEFC),
            DrawRoutine::Unknown
        );
        assert!(link.apply_in_game_fps_fix().is_err());
    }

    #[test]
    fn test_project_diablo2_detection() {
        let (mut game, memory) = synthetic_113c();
        game.pd2 = true;
        let link = D2Link::attach_with(&game, memory);
        assert!(link.is_project_diablo2());
    }

    #[test]
    fn test_texture_classification_round() {
        let (game, memory) = synthetic_113c();
        let link = D2Link::attach_with(&game, memory);

        assert_eq!(
            link.texture_category(0x0836_BFF0),
            TextureCategory::TitleScreen
        );
        // Unknown hash refined by a floor draw call site.
        let routine = link.identify_draw_routine(0x6F85_BEFC);
        assert_eq!(routine, DrawRoutine::Floor);
        assert_eq!(
            link.classify_texture(0xDEAD_BEEF, routine),
            TextureCategory::Floor
        );
    }

    #[test]
    fn test_state_queries_through_link() {
        let (game, memory) = synthetic_113c();
        let client_base = game
            .handles
            .iter()
            .find(|(m, _)| *m == GameModule::D2Client)
            .unwrap()
            .1
            .base;
        memory.set_u32(client_base + 0x11C414, 2);
        memory.set_u32(client_base + 0xFADA4, 1);

        let link = D2Link::attach_with(&game, memory);
        assert_eq!(link.screen_open_mode(), 2);
        assert!(link.is_menu_open());
    }
}
