//! Write access for in-memory code patches.
//!
//! All call sites outside the DLL-load interceptor follow a probe-then-patch
//! protocol: verify the original bytes are present with [`PatchMemory::probe_u32`],
//! and only then overwrite them. A failed probe means the resolved version's
//! offset assumptions do not hold for this particular installation, so the
//! patch is skipped rather than misapplied.

use crate::error::Result;
use crate::memory::ReadMemory;

/// Write access to the game's address space for 4-byte code patches.
pub trait PatchMemory: ReadMemory {
    /// Overwrite the u32 at `address`.
    ///
    /// Implementations lift page protection around the write and restore it
    /// afterwards. The flip/write/restore sequence is not atomic with respect
    /// to concurrent execution of the target bytes; callers patch before the
    /// target code path can run.
    fn patch_u32(&self, address: u64, value: u32) -> Result<()>;

    /// Read-only check that the u32 at `address` equals `expected`.
    ///
    /// Never mutates. An unreadable location counts as a mismatch.
    fn probe_u32(&self, address: u64, expected: u32) -> bool {
        matches!(self.read_u32(address), Ok(found) if found == expected)
    }
}

impl<T: PatchMemory + ?Sized> PatchMemory for &T {
    fn patch_u32(&self, address: u64, value: u32) -> Result<()> {
        (**self).patch_u32(address, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemory;

    #[test]
    fn test_probe_matches_expected() {
        let memory = MockMemory::new(0x1000, 0x2B756FBB_u32.to_le_bytes().to_vec());
        assert!(memory.probe_u32(0x1000, 0x2B756FBB));
        assert!(!memory.probe_u32(0x1000, 0x90909090));
    }

    #[test]
    fn test_probe_unreadable_is_mismatch() {
        let memory = MockMemory::new(0x1000, vec![0; 4]);
        assert!(!memory.probe_u32(0x5000, 0));
    }

    #[test]
    fn test_probe_never_mutates() {
        let memory = MockMemory::new(0x1000, vec![0xAA, 0xBB, 0xCC, 0xDD]);
        memory.probe_u32(0x1000, 0x12345678);
        assert_eq!(memory.read_bytes(0x1000, 4).unwrap(), [0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn test_patch_overwrites() {
        let memory = MockMemory::new(0x1000, vec![0; 8]);
        memory.patch_u32(0x1004, 0x90909090).unwrap();
        assert_eq!(memory.read_u32(0x1004).unwrap(), 0x90909090);
        assert_eq!(memory.read_u32(0x1000).unwrap(), 0);
    }
}
