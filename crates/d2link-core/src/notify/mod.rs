//! Module-load interception.
//!
//! Some game add-ons arrive as DLLs loaded after startup and assume the
//! stock renderer. The expansion resolution module (d2expres.dll) in
//! particular crashes against a replaced renderer unless two of its branches
//! are defused the moment the loader maps it. The loader's DLL notification
//! callback is the only reliable hook for that moment; it is registered
//! through ntdll's `LdrRegisterDllNotification`, which has no import-library
//! entry and is resolved by name at runtime.

use tracing::info;

use crate::error::Result;
use crate::memory::PatchMemory;

/// Branch rewrites applied to the expansion resolution module, relative to
/// its load address.
const EXPANSION_MODULE_PATCHES: &[(u64, u32)] = &[(0x20C9, 0x9090_3BEB), (0x20CD, 0xEB90_9090)];

/// File name of the module that needs defusing on load.
pub const EXPANSION_MODULE_NAME: &str = "d2expres.dll";

/// Whether a freshly loaded module is the expansion resolution module.
fn is_expansion_module(base_name: &str) -> bool {
    base_name.eq_ignore_ascii_case(EXPANSION_MODULE_NAME)
}

/// Rewrite the expansion module's renderer checks at `base`.
pub fn patch_expansion_module<M: PatchMemory>(base: u64, memory: &M) -> Result<()> {
    for &(offset, value) in EXPANSION_MODULE_PATCHES {
        memory.patch_u32(base + offset, value)?;
    }
    info!("Expansion resolution module at {:#x} patched", base);
    Ok(())
}

#[cfg(target_os = "windows")]
pub use watcher::ModuleLoadWatcher;

#[cfg(target_os = "windows")]
mod watcher {
    use super::{is_expansion_module, patch_expansion_module};
    use crate::error::Error;
    use crate::memory::ProcessMemory;
    use tracing::{debug, warn};

    use std::ffi::c_void;
    use std::ptr;

    use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};
    use windows::core::{PCSTR, w};

    const LDR_DLL_NOTIFICATION_REASON_LOADED: u32 = 1;

    #[repr(C)]
    struct UnicodeString {
        length: u16,
        maximum_length: u16,
        buffer: *const u16,
    }

    /// Loaded and unloaded variants share this layout.
    #[repr(C)]
    struct LdrDllNotificationData {
        flags: u32,
        full_dll_name: *const UnicodeString,
        base_dll_name: *const UnicodeString,
        dll_base: *mut c_void,
        size_of_image: u32,
    }

    type LdrDllNotificationFunction =
        unsafe extern "system" fn(u32, *const LdrDllNotificationData, *mut c_void);
    type LdrRegisterFn = unsafe extern "system" fn(
        u32,
        LdrDllNotificationFunction,
        *mut c_void,
        *mut *mut c_void,
    ) -> i32;
    type LdrUnregisterFn = unsafe extern "system" fn(*mut c_void) -> i32;

    unsafe fn ntdll_function(name: PCSTR) -> Option<unsafe extern "system" fn() -> isize> {
        let ntdll = unsafe { GetModuleHandleW(w!("ntdll.dll")) }.ok()?;
        unsafe { GetProcAddress(ntdll, name) }
    }

    unsafe extern "system" fn on_dll_notification(
        reason: u32,
        data: *const LdrDllNotificationData,
        _context: *mut c_void,
    ) {
        if reason != LDR_DLL_NOTIFICATION_REASON_LOADED || data.is_null() {
            return;
        }

        let data = unsafe { &*data };
        if data.base_dll_name.is_null() {
            return;
        }
        let name = unsafe { &*data.base_dll_name };
        let units = usize::from(name.length) / 2;
        let base_name =
            String::from_utf16_lossy(unsafe { std::slice::from_raw_parts(name.buffer, units) });
        debug!("Module loaded: {}", base_name);

        if is_expansion_module(&base_name) {
            let memory = ProcessMemory;
            if let Err(error) = patch_expansion_module(data.dll_base as usize as u64, &memory) {
                warn!("Failed to patch {}: {}", base_name, error);
            }
        }
    }

    /// Registered loader notification, unregistered on drop.
    pub struct ModuleLoadWatcher {
        cookie: *mut c_void,
    }

    impl ModuleLoadWatcher {
        pub fn register() -> crate::error::Result<Self> {
            let register = unsafe { ntdll_function(PCSTR(c"LdrRegisterDllNotification".as_ptr().cast())) }
                .ok_or_else(|| {
                    Error::ModuleNotLoaded("ntdll.dll!LdrRegisterDllNotification".to_string())
                })?;
            let register: LdrRegisterFn = unsafe { std::mem::transmute(register) };

            let mut cookie = ptr::null_mut();
            let status =
                unsafe { register(0, on_dll_notification, ptr::null_mut(), &mut cookie) };
            if status != 0 {
                return Err(Error::MemoryWriteFailed {
                    address: 0,
                    message: format!("LdrRegisterDllNotification failed with {:#x}", status),
                });
            }
            Ok(Self { cookie })
        }
    }

    impl Drop for ModuleLoadWatcher {
        fn drop(&mut self) {
            if let Some(unregister) =
                unsafe { ntdll_function(PCSTR(c"LdrUnregisterDllNotification".as_ptr().cast())) }
            {
                let unregister: LdrUnregisterFn = unsafe { std::mem::transmute(unregister) };
                unsafe { unregister(self.cookie) };
            }
        }
    }
}
