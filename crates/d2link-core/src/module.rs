//! Identities and handles for the game's loaded modules.
//!
//! Classic installs (1.09–1.13) spread the game across a fixed set of DLLs;
//! 1.14 links everything into Game.exe. Fingerprinting inspects whichever of
//! these are present, and the resolver addresses them by [`GameModule`] so no
//! other code carries DLL names around.

use std::collections::HashMap;
use std::path::PathBuf;

use strum::{Display, IntoStaticStr};

/// One module of the game, independent of whether it is currently loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum GameModule {
    /// The host executable (Game.exe).
    Game,
    D2Client,
    D2Cmp,
    D2Common,
    D2Game,
    D2Gfx,
    D2Glide,
    D2Lang,
    D2Launch,
    D2Net,
    D2Win,
    Fog,
    Storm,
}

impl GameModule {
    pub const ALL: [GameModule; 13] = [
        GameModule::Game,
        GameModule::D2Client,
        GameModule::D2Cmp,
        GameModule::D2Common,
        GameModule::D2Game,
        GameModule::D2Gfx,
        GameModule::D2Glide,
        GameModule::D2Lang,
        GameModule::D2Launch,
        GameModule::D2Net,
        GameModule::D2Win,
        GameModule::Fog,
        GameModule::Storm,
    ];

    /// On-disk file name, or `None` for the host executable.
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            GameModule::Game => None,
            GameModule::D2Client => Some("D2Client.dll"),
            GameModule::D2Cmp => Some("D2CMP.dll"),
            GameModule::D2Common => Some("D2Common.dll"),
            GameModule::D2Game => Some("D2Game.dll"),
            GameModule::D2Gfx => Some("D2gfx.dll"),
            GameModule::D2Glide => Some("D2Glide.dll"),
            GameModule::D2Lang => Some("D2Lang.dll"),
            GameModule::D2Launch => Some("D2Launch.dll"),
            GameModule::D2Net => Some("D2Net.dll"),
            GameModule::D2Win => Some("D2Win.dll"),
            GameModule::Fog => Some("Fog.dll"),
            GameModule::Storm => Some("Storm.dll"),
        }
    }

    /// Display name used in diagnostics.
    pub fn display_name(&self) -> &'static str {
        self.file_name().unwrap_or("Game.exe")
    }
}

/// Base address and size of a loaded image. Owned by the OS loader; this
/// layer only ever reads through it.
#[derive(Debug, Clone)]
pub struct ModuleHandle {
    pub base: u64,
    pub size: u64,
    pub path: Option<PathBuf>,
}

impl ModuleHandle {
    pub fn new(base: u64, size: u64) -> Self {
        Self {
            base,
            size,
            path: None,
        }
    }

    pub fn with_path(base: u64, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            base,
            size,
            path: Some(path.into()),
        }
    }
}

/// Source of module handles.
///
/// The production implementation asks the OS loader; tests supply synthetic
/// images.
pub trait ModuleProvider {
    /// Look up (or demand-load) a module, `None` if absent.
    fn module(&self, module: GameModule) -> Option<ModuleHandle>;

    /// Whether an arbitrary module (by file name) is loaded. Used for
    /// third-party mod detection; never demand-loads.
    fn is_loaded(&self, file_name: &str) -> bool;
}

/// Snapshot of every game module present at resolution time.
#[derive(Debug, Clone, Default)]
pub struct ModuleMap {
    modules: HashMap<GameModule, ModuleHandle>,
}

impl ModuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every known module through `provider`; absent ones are simply
    /// not recorded.
    pub fn resolve(provider: &impl ModuleProvider) -> Self {
        let mut map = Self::new();
        for module in GameModule::ALL {
            if let Some(handle) = provider.module(module) {
                map.insert(module, handle);
            }
        }
        map
    }

    pub fn insert(&mut self, module: GameModule, handle: ModuleHandle) {
        self.modules.insert(module, handle);
    }

    pub fn get(&self, module: GameModule) -> Option<&ModuleHandle> {
        self.modules.get(&module)
    }

    pub fn base(&self, module: GameModule) -> Option<u64> {
        self.get(module).map(|handle| handle.base)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(target_os = "windows")]
pub use windows_provider::LoaderModuleProvider;

#[cfg(target_os = "windows")]
mod windows_provider {
    use super::{GameModule, ModuleHandle, ModuleProvider};
    use std::path::PathBuf;

    use windows::Win32::Foundation::{HMODULE, MAX_PATH};
    use windows::Win32::System::LibraryLoader::{
        GetModuleFileNameW, GetModuleHandleW, LoadLibraryW,
    };
    use windows::Win32::System::ProcessStatus::{K32GetModuleInformation, MODULEINFO};
    use windows::Win32::System::Threading::GetCurrentProcess;
    use windows::core::{HSTRING, PCWSTR};

    /// Module lookup through the OS loader, demand-loading game DLLs that
    /// are installed but not yet mapped (matches how the game itself resolves
    /// them lazily).
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LoaderModuleProvider;

    impl LoaderModuleProvider {
        pub fn new() -> Self {
            Self
        }

        fn handle_for(&self, module: GameModule) -> Option<HMODULE> {
            let Some(file_name) = module.file_name() else {
                // Host executable.
                return unsafe { GetModuleHandleW(PCWSTR::null()) }.ok();
            };

            let name = HSTRING::from(file_name);
            if let Ok(handle) = unsafe { GetModuleHandleW(&name) } {
                return Some(handle);
            }

            // Not mapped yet; load it from the game directory.
            let path = std::env::current_dir()
                .map(|dir| dir.join(file_name))
                .unwrap_or_else(|_| PathBuf::from(file_name));
            let path = HSTRING::from(path.as_os_str());
            unsafe { LoadLibraryW(&path) }.ok()
        }

        fn image_size(handle: HMODULE) -> u64 {
            let mut info = MODULEINFO::default();
            let size = std::mem::size_of::<MODULEINFO>() as u32;
            let ok = unsafe {
                K32GetModuleInformation(GetCurrentProcess(), handle, &mut info, size)
            };
            if ok.as_bool() { info.SizeOfImage as u64 } else { 0 }
        }

        fn image_path(handle: HMODULE) -> Option<PathBuf> {
            let mut buffer = [0u16; MAX_PATH as usize];
            let len = unsafe { GetModuleFileNameW(handle, &mut buffer) } as usize;
            if len == 0 {
                return None;
            }
            Some(PathBuf::from(String::from_utf16_lossy(&buffer[..len])))
        }
    }

    impl ModuleProvider for LoaderModuleProvider {
        fn module(&self, module: GameModule) -> Option<ModuleHandle> {
            let handle = self.handle_for(module)?;
            let base = handle.0 as u64;
            let size = Self::image_size(handle);
            let mut resolved = ModuleHandle::new(base, size);
            resolved.path = Self::image_path(handle);
            Some(resolved)
        }

        fn is_loaded(&self, file_name: &str) -> bool {
            let name = HSTRING::from(file_name);
            unsafe { GetModuleHandleW(&name) }.is_ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(GameModule::Game.file_name(), None);
        assert_eq!(GameModule::Game.display_name(), "Game.exe");
        assert_eq!(GameModule::D2Client.file_name(), Some("D2Client.dll"));
        assert_eq!(GameModule::Fog.display_name(), "Fog.dll");
    }

    #[test]
    fn test_module_map_lookup() {
        let mut map = ModuleMap::new();
        map.insert(GameModule::D2Client, ModuleHandle::new(0x6FAB0000, 0x120000));

        assert_eq!(map.base(GameModule::D2Client), Some(0x6FAB0000));
        assert_eq!(map.base(GameModule::D2Win), None);
        assert_eq!(map.len(), 1);
    }
}
