//! # d2link-core
//!
//! Runtime compatibility layer for the several retail builds of Diablo II a
//! graphics wrapper may find itself injected into. The game ships no public
//! API; every build moves its data structures, globals, and function
//! addresses around, so everything here is keyed off one fingerprint pass.
//!
//! This crate provides:
//! - Build fingerprinting from loaded module entry points
//! - Version-indexed access to units, game state flags, and draw context
//! - Game function location (fixed offsets and export ordinals)
//! - Texture classification by content hash and draw routine
//! - Probe-then-patch frame pacing fixes
//! - A loader notification watcher for late-loaded add-on modules
//!
//! All core logic is generic over [`memory::ReadMemory`] and
//! [`memory::PatchMemory`]; the in-process Windows implementations are
//! target-gated, so the crate builds and tests everywhere.

pub mod error;
pub mod game;
pub mod link;
pub mod memory;
pub mod module;
pub mod notify;
pub mod patches;
pub mod pe;
pub mod texture;
pub mod version;

pub use error::{Error, Result};
pub use game::{
    DrawParameters, DrawRoutine, ExportResolver, FunctionLocation, GameAccessor, GameFunction,
    Position, UnitKind, WindowSize, configured_window_size, identify_draw_routine,
    resolve_function,
};
pub use link::D2Link;
pub use memory::{PatchMemory, ReadMemory};
pub use module::{GameModule, ModuleHandle, ModuleMap, ModuleProvider};
pub use patches::{apply_in_game_fps_fix, apply_menu_fps_fix, apply_sleep_fixes};
pub use texture::{ClassificationIndex, TextureCategory, refine_category};
pub use version::{
    Fingerprint, FingerprintReport, GameVersion, ModuleObservation, fingerprint,
};

#[cfg(target_os = "windows")]
pub use game::LoaderExportResolver;
#[cfg(target_os = "windows")]
pub use memory::ProcessMemory;
#[cfg(target_os = "windows")]
pub use module::LoaderModuleProvider;
#[cfg(target_os = "windows")]
pub use notify::ModuleLoadWatcher;
