//! Abstract game functions and their per-version locations.
//!
//! Classic builds export the draw primitives by ordinal from D2gfx/D2Win and
//! keep the client routines at fixed module offsets; 1.14 has everything at
//! fixed offsets inside Game.exe. Callers ask for a [`GameFunction`] and get
//! back a callable address, never a raw recipe.

use strum::{Display, IntoStaticStr};

use crate::module::{GameModule, ModuleMap};
use crate::version::GameVersion;

/// Version-independent identifier for a game routine this layer can locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum GameFunction {
    DrawImage,
    DrawShiftedImage,
    DrawVerticalCropImage,
    DrawClippedImage,
    DrawImageFast,
    DrawShadow,
    DrawText,
    DrawTextEx,
    DrawFramedText,
    DrawRectangledText,
    DrawUnit,
    DrawMissile,
    DrawWeatherParticles,
    FindClientSideUnit,
    FindServerSideUnit,
    GetClientPlayer,
}

/// Recipe for obtaining a callable address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionLocation {
    /// Fixed offset from a module's load address.
    ModuleOffset { module: GameModule, offset: u64 },
    /// Export resolved by ordinal.
    Export { module: GameModule, ordinal: u16 },
}

/// Resolution of export ordinals to addresses; implemented over the OS
/// loader in production and by fixtures in tests.
pub trait ExportResolver {
    fn export_by_ordinal(&self, module: GameModule, ordinal: u16) -> Option<u64>;
}

use FunctionLocation::{Export, ModuleOffset};
use GameFunction::*;
use GameModule::{D2Client, D2Gfx, D2Win, Game};

fn offset(module: GameModule, offset: u64) -> Option<FunctionLocation> {
    Some(ModuleOffset { module, offset })
}

fn export(module: GameModule, ordinal: u16) -> Option<FunctionLocation> {
    Some(Export { module, ordinal })
}

/// Location recipe for `function` on `version`, `None` when that build has
/// no known location for it.
pub fn locate(version: GameVersion, function: GameFunction) -> Option<FunctionLocation> {
    match version {
        GameVersion::Lod109d => match function {
            DrawImage => export(D2Gfx, 10072),
            DrawShiftedImage => export(D2Gfx, 10073),
            DrawVerticalCropImage => export(D2Gfx, 10074),
            DrawClippedImage => export(D2Gfx, 10077),
            DrawImageFast => export(D2Gfx, 10076),
            DrawShadow => export(D2Gfx, 10075),
            DrawText => export(D2Win, 10117),
            DrawFramedText => export(D2Win, 10129),
            DrawRectangledText => export(D2Win, 10132),
            DrawUnit => offset(D2Client, 0xB8350),
            DrawWeatherParticles => offset(D2Client, 0x07BC0),
            FindClientSideUnit => offset(D2Client, 0x8B560),
            FindServerSideUnit => offset(D2Client, 0x8B5D0),
            GetClientPlayer => offset(D2Client, 0x8CFC0),
            _ => None,
        },
        GameVersion::Lod110f => match function {
            DrawImage => export(D2Gfx, 10072),
            DrawShiftedImage => export(D2Gfx, 10073),
            DrawVerticalCropImage => export(D2Gfx, 10074),
            DrawClippedImage => export(D2Gfx, 10077),
            DrawImageFast => export(D2Gfx, 10076),
            DrawShadow => export(D2Gfx, 10075),
            DrawText => export(D2Win, 10117),
            DrawFramedText => export(D2Win, 10129),
            DrawRectangledText => export(D2Win, 10132),
            DrawUnit => offset(D2Client, 0xBA720),
            DrawWeatherParticles => offset(D2Client, 0x08240),
            FindClientSideUnit => offset(D2Client, 0x869F0),
            FindServerSideUnit => offset(D2Client, 0x86A60),
            GetClientPlayer => offset(D2Client, 0x883D0),
            _ => None,
        },
        GameVersion::Lod112 => match function {
            DrawImage => export(D2Gfx, 10024),
            DrawShiftedImage => export(D2Gfx, 10044),
            DrawVerticalCropImage => export(D2Gfx, 10046),
            DrawClippedImage => export(D2Gfx, 10061),
            DrawImageFast => export(D2Gfx, 10012),
            DrawShadow => export(D2Gfx, 10030),
            DrawText => export(D2Win, 10001),
            DrawFramedText => export(D2Win, 10031),
            DrawRectangledText => export(D2Win, 10082),
            DrawUnit => offset(D2Client, 0x94250),
            DrawMissile => offset(D2Client, 0x949C0),
            DrawWeatherParticles => offset(D2Client, 0x14210),
            FindClientSideUnit => offset(D2Client, 0x1F1A0),
            FindServerSideUnit => offset(D2Client, 0x1F1C0),
            _ => None,
        },
        GameVersion::Lod113c => match function {
            DrawImage => export(D2Gfx, 10041),
            DrawShiftedImage => export(D2Gfx, 10019),
            DrawVerticalCropImage => export(D2Gfx, 10074),
            DrawClippedImage => export(D2Gfx, 10079),
            DrawImageFast => export(D2Gfx, 10046),
            DrawShadow => export(D2Gfx, 10011),
            DrawText => export(D2Win, 10096),
            DrawFramedText => export(D2Win, 10085),
            DrawRectangledText => export(D2Win, 10013),
            DrawUnit => offset(D2Client, 0x6C490),
            DrawMissile => offset(D2Client, 0x6CC00),
            DrawWeatherParticles => offset(D2Client, 0x7FE80),
            FindClientSideUnit => offset(D2Client, 0xA5B20),
            FindServerSideUnit => offset(D2Client, 0xA5B40),
            _ => None,
        },
        GameVersion::Lod113d => match function {
            DrawImage => export(D2Gfx, 10042),
            DrawShiftedImage => export(D2Gfx, 10067),
            DrawVerticalCropImage => export(D2Gfx, 10082),
            DrawClippedImage => export(D2Gfx, 10015),
            DrawImageFast => export(D2Gfx, 10006),
            DrawShadow => export(D2Gfx, 10084),
            DrawText => export(D2Win, 10076),
            DrawTextEx => export(D2Win, 10084),
            DrawFramedText => export(D2Win, 10137),
            DrawRectangledText => export(D2Win, 10078),
            DrawUnit => offset(D2Client, 0x605B0),
            DrawMissile => offset(D2Client, 0x60C70),
            DrawWeatherParticles => offset(D2Client, 0x4AD90),
            FindClientSideUnit => offset(D2Client, 0x620B0),
            FindServerSideUnit => offset(D2Client, 0x620D0),
            _ => None,
        },
        GameVersion::Lod114d => match function {
            DrawImage => offset(Game, 0xF6480),
            DrawShiftedImage => offset(Game, 0xF64B0),
            DrawVerticalCropImage => offset(Game, 0xF64E0),
            DrawClippedImage => offset(Game, 0xF6510),
            DrawImageFast => offset(Game, 0xF6570),
            DrawShadow => offset(Game, 0xF6540),
            DrawText => offset(Game, 0x102320),
            DrawTextEx => offset(Game, 0x102360),
            DrawFramedText => offset(Game, 0x102280),
            DrawRectangledText => offset(Game, 0x1023B0),
            DrawUnit => offset(Game, 0x70EC0),
            DrawMissile => offset(Game, 0x71EC0),
            DrawWeatherParticles => offset(Game, 0x73470),
            FindClientSideUnit => offset(Game, 0x63990),
            FindServerSideUnit => offset(Game, 0x639B0),
            GetClientPlayer => None,
        },
        GameVersion::Unsupported => None,
    }
}

/// Resolve `function` to a callable address, `None` when the version has no
/// location for it, the module is absent, or the export is missing.
pub fn resolve_function(
    version: GameVersion,
    function: GameFunction,
    modules: &ModuleMap,
    exports: &impl ExportResolver,
) -> Option<u64> {
    match locate(version, function)? {
        ModuleOffset { module, offset } => Some(modules.base(module)? + offset),
        Export { module, ordinal } => exports.export_by_ordinal(module, ordinal),
    }
}

#[cfg(target_os = "windows")]
pub use loader_exports::LoaderExportResolver;

#[cfg(target_os = "windows")]
mod loader_exports {
    use super::ExportResolver;
    use crate::module::GameModule;

    use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};
    use windows::core::{HSTRING, PCSTR, PCWSTR};

    /// Export lookup through `GetProcAddress` with an ordinal import name.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LoaderExportResolver;

    impl ExportResolver for LoaderExportResolver {
        fn export_by_ordinal(&self, module: GameModule, ordinal: u16) -> Option<u64> {
            let handle = match module.file_name() {
                Some(file_name) => {
                    let name = HSTRING::from(file_name);
                    unsafe { GetModuleHandleW(&name) }.ok()?
                }
                None => unsafe { GetModuleHandleW(PCWSTR::null()) }.ok()?,
            };

            // Ordinal import: the low word of the name pointer is the ordinal.
            let name = PCSTR(ordinal as usize as *const u8);
            let address = unsafe { GetProcAddress(handle, name) }?;
            Some(address as usize as u64)
        }
    }
}
