//! Read access to game process memory.
//!
//! Everything that inspects the game goes through [`ReadMemory`] so that
//! version fingerprinting and field resolution can be exercised against
//! synthetic memory in tests. A failed read is an expected outcome (foreign
//! pointers are untrusted) and surfaces as an error, never as a fault.

use crate::error::Result;

/// Byte-level read access to the game's address space.
pub trait ReadMemory {
    /// Read `len` bytes starting at `address`.
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>>;

    /// Read a little-endian u32 at `address`.
    fn read_u32(&self, address: u64) -> Result<u32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian i32 at `address`.
    fn read_i32(&self, address: u64) -> Result<i32> {
        Ok(self.read_u32(address)? as i32)
    }

    /// Read a little-endian u16 at `address`.
    fn read_u16(&self, address: u64) -> Result<u16> {
        let bytes = self.read_bytes(address, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a 32-bit pointer at `address`, widened to u64.
    ///
    /// The game is a 32-bit process; every in-game pointer is 4 bytes.
    fn read_ptr32(&self, address: u64) -> Result<u64> {
        Ok(self.read_u32(address)? as u64)
    }
}

impl<T: ReadMemory + ?Sized> ReadMemory for &T {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, len)
    }
}
