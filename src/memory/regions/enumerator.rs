//! Memory region enumeration through VirtualQueryEx

use crate::core::types::Address;
use crate::memory::regions::{RegionInfo, RegionState, RegionType};
use crate::windows::bindings::kernel32;
use winapi::um::winnt::{HANDLE, MEMORY_BASIC_INFORMATION};

const MEM_COMMIT: u32 = 0x1000;
const MEM_RESERVE: u32 = 0x2000;
const MEM_FREE: u32 = 0x10000;
const MEM_PRIVATE: u32 = 0x20000;
const MEM_MAPPED: u32 = 0x40000;
const MEM_IMAGE: u32 = 0x1000000;

const PAGE_NOACCESS: u32 = 0x01;
const PAGE_GUARD: u32 = 0x100;
const PAGE_WRITABLE: u32 = 0x04 | 0x08 | 0x40 | 0x80;
const PAGE_EXECUTABLE: u32 = 0x10 | 0x20 | 0x40 | 0x80;

/// Walks the address space of a process from address zero upwards
pub struct RegionEnumerator {
    handle: HANDLE,
    current_address: Address,
}

impl RegionEnumerator {
    /// Create a new region enumerator over a process handle.
    ///
    /// The handle is borrowed; the caller keeps it open for the lifetime of
    /// the enumerator.
    pub fn new(handle: HANDLE) -> Self {
        RegionEnumerator {
            handle,
            current_address: Address::null(),
        }
    }

    /// Get the next memory region
    pub fn next_region(&mut self) -> Option<RegionInfo> {
        // VirtualQueryEx fails past the highest user-mode address
        let mbi = unsafe { kernel32::virtual_query_ex(self.handle, self.current_address.as_usize()) }
            .ok()?;
        let region = parse_memory_info(&mbi);

        self.current_address = region.base_address.checked_add(region.size)?;
        if region.size == 0 {
            return None;
        }

        Some(region)
    }
}

impl Iterator for RegionEnumerator {
    type Item = RegionInfo;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_region()
    }
}

/// Parse MEMORY_BASIC_INFORMATION into RegionInfo
fn parse_memory_info(mbi: &MEMORY_BASIC_INFORMATION) -> RegionInfo {
    let state = match mbi.State {
        MEM_COMMIT => RegionState::Committed,
        MEM_RESERVE => RegionState::Reserved,
        MEM_FREE => RegionState::Free,
        _ => RegionState::Free,
    };

    let region_type = match mbi.Type {
        MEM_PRIVATE => RegionType::Private,
        MEM_MAPPED => RegionType::Mapped,
        MEM_IMAGE => RegionType::Image,
        _ => RegionType::Private,
    };

    RegionInfo {
        base_address: Address::new(mbi.BaseAddress as usize),
        size: mbi.RegionSize,
        state,
        region_type,
        readable: state == RegionState::Committed
            && mbi.Protect != PAGE_NOACCESS
            && (mbi.Protect & PAGE_GUARD) == 0,
        writable: (mbi.Protect & PAGE_WRITABLE) != 0,
        executable: (mbi.Protect & PAGE_EXECUTABLE) != 0,
    }
}
