use std::ops::{Index, IndexMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ProcessorError;

/// Size of the zero page, the first 256 addressable bytes.
pub const ZERO_PAGE_SIZE: usize = 0x100;

/// Full 16-bit address space.
pub const DEFAULT_MEMORY_LIMIT: usize = 0x1_0000;

/// Memory as seen from the execution core.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
    /// Side-effect free read for tracing and disassembly.
    fn peek(&self, addr: u16) -> u8;
}

/// Handle through which the board and the processor share one memory.
pub type SharedMemory = Arc<Mutex<Memory>>;

pub fn shared(memory: Memory) -> SharedMemory {
    Arc::new(Mutex::new(memory))
}

/// Lock the shared memory. The contents are plain bytes, so a panic on
/// another thread leaves nothing half-updated worth refusing access over.
pub fn lock(memory: &SharedMemory) -> MutexGuard<'_, Memory> {
    memory.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Flat byte store sized to the configured memory limit.
///
/// The buffer is allocated once; loading an image overwrites it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    pub fn new(limit: usize) -> Result<Self, ProcessorError> {
        check_limit(limit)?;
        Ok(Self {
            data: vec![0; limit],
        })
    }

    pub fn limit(&self) -> usize {
        self.data.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Install a caller-supplied image.
    ///
    /// An image shorter than `limit - 255` bytes gets a zero page prepended
    /// and lands at 0x0100; anything left over is zero filled.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), ProcessorError> {
        let limit = self.limit();
        let offset = image_offset(image.len(), limit)?;

        self.data.fill(0);
        self.data[offset..offset + image.len()].copy_from_slice(image);
        log::debug!(
            "Loaded {} byte image at {:#06X} ({} byte limit)",
            image.len(),
            offset,
            limit
        );
        Ok(())
    }
}

/// Where an image of `len` bytes is placed inside a memory of `limit` bytes.
pub fn image_offset(len: usize, limit: usize) -> Result<usize, ProcessorError> {
    check_limit(limit)?;
    if len > limit {
        return Err(ProcessorError::ImageTooLarge { len, limit });
    }
    // limit - 255 > len implies 256 + len <= limit
    if len < limit - (ZERO_PAGE_SIZE - 1) {
        Ok(ZERO_PAGE_SIZE)
    } else {
        Ok(0)
    }
}

fn check_limit(limit: usize) -> Result<(), ProcessorError> {
    if limit <= ZERO_PAGE_SIZE || limit > DEFAULT_MEMORY_LIMIT {
        return Err(ProcessorError::InvalidMemoryLimit { limit });
    }
    Ok(())
}

impl Bus for Memory {
    fn read(&mut self, addr: u16) -> u8 {
        match self.data.get(addr as usize) {
            Some(&value) => value,
            None => {
                log::warn!(
                    "Read from {:04X} beyond {} byte memory limit",
                    addr,
                    self.limit()
                );
                0
            }
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        let limit = self.limit();
        match self.data.get_mut(addr as usize) {
            Some(slot) => *slot = value,
            None => log::warn!(
                "Write of {:02X} to {:04X} beyond {} byte memory limit dropped",
                value,
                addr,
                limit
            ),
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        self.data.get(addr as usize).copied().unwrap_or(0)
    }
}

impl Index<u16> for Memory {
    type Output = u8;

    fn index(&self, addr: u16) -> &u8 {
        &self.data[addr as usize]
    }
}

impl IndexMut<u16> for Memory {
    fn index_mut(&mut self, addr: u16) -> &mut u8 {
        &mut self.data[addr as usize]
    }
}

impl<'a> IntoIterator for &'a Memory {
    type Item = &'a u8;
    type IntoIter = std::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
