//! In-process memory access for the live game.
//!
//! Reads go through `ReadProcessMemory` on the current process instead of raw
//! pointer dereferences so that a bad foreign pointer comes back as an error
//! rather than an access violation.

use std::ffi::c_void;

use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Memory::{
    PAGE_EXECUTE_READWRITE, PAGE_PROTECTION_FLAGS, VirtualProtect,
};
use windows::Win32::System::Threading::GetCurrentProcess;

use crate::error::{Error, Result};
use crate::memory::{PatchMemory, ReadMemory};

/// Memory access over the process this layer is loaded into.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl ProcessMemory {
    pub fn new() -> Self {
        Self
    }
}

impl ReadMemory for ProcessMemory {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; len];
        let mut read = 0usize;

        // SAFETY: the buffer outlives the call and the kernel validates the
        // source range for us.
        let outcome = unsafe {
            ReadProcessMemory(
                GetCurrentProcess(),
                address as usize as *const c_void,
                buffer.as_mut_ptr() as *mut c_void,
                len,
                Some(&mut read as *mut _),
            )
        };

        match outcome {
            Ok(()) if read == len => Ok(buffer),
            Ok(()) => Err(Error::MemoryReadFailed {
                address,
                message: format!("short read: {} of {} bytes", read, len),
            }),
            Err(e) => Err(Error::MemoryReadFailed {
                address,
                message: e.message().to_string(),
            }),
        }
    }
}

impl PatchMemory for ProcessMemory {
    fn patch_u32(&self, address: u64, value: u32) -> Result<()> {
        let location = address as usize as *mut u32;
        let mut previous = PAGE_PROTECTION_FLAGS(0);

        // SAFETY: protection is lifted for exactly these 4 bytes and restored
        // below; the write itself targets a mapped module image.
        unsafe {
            VirtualProtect(
                location as *const c_void,
                4,
                PAGE_EXECUTE_READWRITE,
                &mut previous,
            )
            .map_err(|e| Error::MemoryWriteFailed {
                address,
                message: e.message().to_string(),
            })?;

            location.write_volatile(value);

            let mut restored = PAGE_PROTECTION_FLAGS(0);
            VirtualProtect(location as *const c_void, 4, previous, &mut restored).map_err(|e| {
                Error::MemoryWriteFailed {
                    address,
                    message: e.message().to_string(),
                }
            })?;
        }

        Ok(())
    }
}
