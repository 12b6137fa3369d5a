//! Minimal, bounds-checked PE header inspection.
//!
//! Fingerprinting only needs two fields out of a loaded image: the code
//! entry-point RVA and the preferred load address. Both magic numbers (DOS
//! and NT) are validated before any other field is trusted, and every read is
//! routed through [`ReadMemory`] so an unmapped or truncated header is
//! reported as absent instead of faulting.

use tracing::debug;

use crate::memory::ReadMemory;
use crate::module::ModuleHandle;

const DOS_MAGIC: u16 = 0x5A4D; // "MZ"
const NT_MAGIC: u32 = 0x0000_4550; // "PE\0\0"

const DOS_LFANEW_OFFSET: u64 = 0x3C;
const OPTIONAL_ENTRY_POINT_OFFSET: u64 = 0x28;
const OPTIONAL_IMAGE_BASE_OFFSET: u64 = 0x34;

/// The header fields fingerprinting cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    /// `AddressOfEntryPoint` (RVA).
    pub entry_point: u32,
    /// `ImageBase` the linker asked for; differs from the load address when
    /// the image was relocated.
    pub preferred_base: u32,
}

/// Parse the header of a loaded image, `None` when the memory is unreadable
/// or either magic number is wrong.
pub fn read_image_header<R: ReadMemory>(reader: &R, module: &ModuleHandle) -> Option<ImageHeader> {
    let base = module.base;

    let dos_magic = reader.read_u16(base).ok()?;
    if dos_magic != DOS_MAGIC {
        debug!("Image at {:#x} has no DOS signature", base);
        return None;
    }

    let lfanew = reader.read_u32(base + DOS_LFANEW_OFFSET).ok()? as u64;
    if module.size > 0 && lfanew + OPTIONAL_IMAGE_BASE_OFFSET + 4 > module.size {
        debug!("Image at {:#x} has NT headers outside the image", base);
        return None;
    }

    let nt_magic = reader.read_u32(base + lfanew).ok()?;
    if nt_magic != NT_MAGIC {
        debug!("Image at {:#x} has no NT signature", base);
        return None;
    }

    let entry_point = reader.read_u32(base + lfanew + OPTIONAL_ENTRY_POINT_OFFSET).ok()?;
    let preferred_base = reader.read_u32(base + lfanew + OPTIONAL_IMAGE_BASE_OFFSET).ok()?;

    Some(ImageHeader {
        entry_point,
        preferred_base,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemory;

    #[test]
    fn test_parse_valid_header() {
        let memory = MockMemory::zeroed(0x6FAB0000, 0x200);
        testing::write_pe_header(&memory, 0x45F6, 0x6FAB0000);

        let module = ModuleHandle::new(0x6FAB0000, 0x200);
        let header = read_image_header(&memory, &module).unwrap();
        assert_eq!(header.entry_point, 0x45F6);
        assert_eq!(header.preferred_base, 0x6FAB0000);
    }

    #[test]
    fn test_reject_missing_dos_magic() {
        let memory = MockMemory::zeroed(0x400000, 0x200);
        let module = ModuleHandle::new(0x400000, 0x200);
        assert!(read_image_header(&memory, &module).is_none());
    }

    #[test]
    fn test_reject_missing_nt_magic() {
        let memory = MockMemory::zeroed(0x400000, 0x200);
        memory.set_u32(0x400000, u32::from(DOS_MAGIC));
        memory.set_u32(0x400000 + DOS_LFANEW_OFFSET, 0x80);

        let module = ModuleHandle::new(0x400000, 0x200);
        assert!(read_image_header(&memory, &module).is_none());
    }

    #[test]
    fn test_reject_lfanew_outside_image() {
        let memory = MockMemory::zeroed(0x400000, 0x200);
        memory.set_u32(0x400000, u32::from(DOS_MAGIC));
        memory.set_u32(0x400000 + DOS_LFANEW_OFFSET, 0x10000);

        let module = ModuleHandle::new(0x400000, 0x200);
        assert!(read_image_header(&memory, &module).is_none());
    }

    #[test]
    fn test_unreadable_header_is_absent() {
        let memory = MockMemory::zeroed(0x400000, 0x10);
        let module = ModuleHandle::new(0x500000, 0x200);
        assert!(read_image_header(&memory, &module).is_none());
    }
}
