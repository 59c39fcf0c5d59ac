//! In-memory stand-in for an attached process

#![allow(dead_code)]

use memory_modder::memory::{RegionInfo, RegionState, RegionType};
use memory_modder::{Address, MemoryError, MemoryResult, ProcessId, ProcessMemory};
use std::cell::{Cell, RefCell};

/// One block of fake memory
pub struct Block {
    pub info: RegionInfo,
    pub bytes: Vec<u8>,
    /// Reads and writes here fail outright
    pub unreadable: bool,
    /// Readable prefix length; reads past it come back short
    pub readable_len: Option<usize>,
}

/// Fake process whose address space is a list of blocks
pub struct FakeProcess {
    blocks: RefCell<Vec<Block>>,
    reads: Cell<usize>,
}

impl FakeProcess {
    pub fn new() -> Self {
        FakeProcess {
            blocks: RefCell::new(Vec::new()),
            reads: Cell::new(0),
        }
    }

    /// Adds a committed private block holding `bytes`
    pub fn with_block(self, base: usize, bytes: Vec<u8>) -> Self {
        self.with_region(base, bytes, RegionType::Private)
    }

    pub fn with_region(self, base: usize, bytes: Vec<u8>, region_type: RegionType) -> Self {
        let info = RegionInfo::committed(Address::new(base), bytes.len(), region_type);
        self.blocks.borrow_mut().push(Block {
            info,
            bytes,
            unreadable: false,
            readable_len: None,
        });
        self
    }

    /// Adds a reserved block that a scan must skip
    pub fn with_reserved(self, base: usize, size: usize) -> Self {
        let info = RegionInfo {
            state: RegionState::Reserved,
            readable: false,
            ..RegionInfo::committed(Address::new(base), size, RegionType::Private)
        };
        self.blocks.borrow_mut().push(Block {
            info,
            bytes: vec![0; size],
            unreadable: true,
            readable_len: None,
        });
        self
    }

    /// Adds a block of `u32` values
    pub fn with_u32s(self, base: usize, values: &[u32]) -> Self {
        self.with_block(base, values.iter().flat_map(|v| v.to_ne_bytes()).collect())
    }

    pub fn with_f32s(self, base: usize, values: &[f32]) -> Self {
        self.with_block(base, values.iter().flat_map(|v| v.to_ne_bytes()).collect())
    }

    /// Makes the block at `base` fail every access
    pub fn make_unreadable(&self, base: usize) {
        for block in self.blocks.borrow_mut().iter_mut() {
            if block.info.base_address == Address::new(base) {
                block.unreadable = true;
            }
        }
    }

    /// Limits reads of the block at `base` to its first `len` bytes
    pub fn truncate_reads(&self, base: usize, len: usize) {
        for block in self.blocks.borrow_mut().iter_mut() {
            if block.info.base_address == Address::new(base) {
                block.readable_len = Some(len);
            }
        }
    }

    /// Overwrites memory directly, as the target itself would
    pub fn poke(&self, address: usize, data: &[u8]) {
        let mut blocks = self.blocks.borrow_mut();
        for block in blocks.iter_mut() {
            let base = block.info.base_address.as_usize();
            if address >= base && address + data.len() <= base + block.bytes.len() {
                let start = address - base;
                block.bytes[start..start + data.len()].copy_from_slice(data);
                return;
            }
        }
        panic!("poke outside fake memory at 0x{:X}", address);
    }

    pub fn read_calls(&self) -> usize {
        self.reads.get()
    }
}

impl ProcessMemory for FakeProcess {
    fn pid(&self) -> ProcessId {
        4242
    }

    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        self.reads.set(self.reads.get() + 1);
        let blocks = self.blocks.borrow();
        let block = blocks
            .iter()
            .find(|b| b.info.contains(address) && !b.unreadable)
            .ok_or_else(|| MemoryError::address_out_of_range(address, "unmapped"))?;

        let start = address.as_usize() - block.info.base_address.as_usize();
        let limit = block.readable_len.unwrap_or(block.bytes.len());
        if start >= limit {
            return Err(MemoryError::address_out_of_range(address, "unreadable"));
        }
        let n = buffer.len().min(limit - start);
        buffer[..n].copy_from_slice(&block.bytes[start..start + n]);
        Ok(n)
    }

    fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        let mut blocks = self.blocks.borrow_mut();
        let block = blocks
            .iter_mut()
            .find(|b| b.info.contains(address) && !b.unreadable)
            .ok_or_else(|| MemoryError::address_out_of_range(address, "unmapped"))?;

        let start = address.as_usize() - block.info.base_address.as_usize();
        let n = data.len().min(block.bytes.len() - start);
        block.bytes[start..start + n].copy_from_slice(&data[..n]);
        Ok(n)
    }

    fn regions(&self) -> MemoryResult<Vec<RegionInfo>> {
        Ok(self.blocks.borrow().iter().map(|b| b.info.clone()).collect())
    }
}
