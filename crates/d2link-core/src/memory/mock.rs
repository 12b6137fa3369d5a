//! Mock memory backing for tests.

use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::memory::{PatchMemory, ReadMemory};

/// A contiguous byte buffer pretending to live at a fixed base address.
pub struct MockMemory {
    base: u64,
    bytes: RefCell<Vec<u8>>,
}

impl MockMemory {
    pub fn new(base: u64, bytes: Vec<u8>) -> Self {
        Self {
            base,
            bytes: RefCell::new(bytes),
        }
    }

    /// Zero-filled region of `len` bytes at `base`.
    pub fn zeroed(base: u64, len: usize) -> Self {
        Self::new(base, vec![0; len])
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.borrow().is_empty()
    }

    /// Place a little-endian u32 at `address` while building the fixture.
    pub fn set_u32(&self, address: u64, value: u32) {
        let offset = (address - self.base) as usize;
        self.bytes.borrow_mut()[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn bounds_check(&self, address: u64, len: usize) -> Result<usize> {
        let size = self.bytes.borrow().len() as u64;
        let end = address.checked_add(len as u64);
        match end {
            Some(end) if address >= self.base && end <= self.base + size => {
                Ok((address - self.base) as usize)
            }
            _ => Err(Error::MemoryReadFailed {
                address,
                message: "outside mock region".to_string(),
            }),
        }
    }
}

impl ReadMemory for MockMemory {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        let offset = self.bounds_check(address, len)?;
        Ok(self.bytes.borrow()[offset..offset + len].to_vec())
    }
}

impl PatchMemory for MockMemory {
    fn patch_u32(&self, address: u64, value: u32) -> Result<()> {
        let offset = self.bounds_check(address, 4).map_err(|_| Error::MemoryWriteFailed {
            address,
            message: "outside mock region".to_string(),
        })?;
        self.bytes.borrow_mut()[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }
}
