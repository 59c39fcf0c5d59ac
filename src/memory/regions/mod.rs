//! Memory regions as reported by the operating system
//!
//! Both backends describe the target's address space with the same
//! [`RegionInfo`] model: a state (committed, reserved or free) and a type
//! (private, mapped or image). A scan only visits committed private and
//! mapped regions.

#[cfg(windows)]
pub mod enumerator;

#[cfg(windows)]
pub use enumerator::RegionEnumerator;

use crate::core::types::Address;
use serde::Serialize;
use std::fmt;

/// State of a memory region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegionState {
    /// Memory is committed and accessible
    Committed,
    /// Memory is reserved but not committed
    Reserved,
    /// Memory is free/unallocated
    Free,
}

/// Type of memory region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegionType {
    /// Private memory
    Private,
    /// Mapped memory (file mapping)
    Mapped,
    /// Image memory (executable/DLL)
    Image,
}

/// Information about a memory region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionInfo {
    /// Base address of the region
    pub base_address: Address,
    /// Size of the region in bytes
    pub size: usize,
    /// Current state of the region
    pub state: RegionState,
    /// Type of the region
    pub region_type: RegionType,
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
}

impl RegionInfo {
    /// Committed, read-only region of the given type
    pub fn committed(base_address: Address, size: usize, region_type: RegionType) -> Self {
        RegionInfo {
            base_address,
            size,
            state: RegionState::Committed,
            region_type,
            readable: true,
            writable: false,
            executable: false,
        }
    }

    /// Get the end address of the region
    pub fn end_address(&self) -> Address {
        self.base_address.wrapping_add(self.size)
    }

    /// Check if an address is within this region
    pub fn contains(&self, address: Address) -> bool {
        address >= self.base_address && address < self.end_address()
    }

    /// Committed, readable private or mapped memory
    pub fn is_scan_target(&self) -> bool {
        self.state == RegionState::Committed
            && self.readable
            && matches!(self.region_type, RegionType::Private | RegionType::Mapped)
    }
}

impl fmt::Display for RegionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} +0x{:X} {:?}/{:?} {}{}{}",
            self.base_address,
            self.size,
            self.state,
            self.region_type,
            if self.readable { 'r' } else { '-' },
            if self.writable { 'w' } else { '-' },
            if self.executable { 'x' } else { '-' },
        )
    }
}
