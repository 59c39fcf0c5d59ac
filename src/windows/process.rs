//! Attached Windows process backed by an owned process HANDLE

use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use crate::memory::regions::{RegionEnumerator, RegionInfo};
use crate::windows::bindings::{kernel32, psapi};
use crate::windows::types::Handle;

/// Open handle to a live Windows process
pub struct WindowsProcess {
    pid: ProcessId,
    handle: Handle,
}

impl WindowsProcess {
    /// Opens `pid` with all access and checks that it is still running.
    ///
    /// The handle is wrapped before the liveness check, so it is closed on
    /// every failure path.
    pub fn open(pid: ProcessId) -> MemoryResult<Self> {
        let handle = Handle::new(kernel32::open_process_all_access(pid)?);

        match unsafe { kernel32::is_process_active(handle.raw()) } {
            Ok(true) => Ok(WindowsProcess { pid, handle }),
            Ok(false) | Err(_) => Err(MemoryError::ProcessNotRunning(pid)),
        }
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Executable file name, e.g. `game.exe`
    pub fn name(&self) -> MemoryResult<String> {
        unsafe { psapi::get_module_base_name(self.handle.raw(), std::ptr::null_mut()) }
    }

    /// Load address of the executable module
    pub fn base_address(&self) -> MemoryResult<Address> {
        let module = unsafe { psapi::main_module(self.handle.raw())? };
        Ok(Address::new(module as usize))
    }

    pub fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        unsafe { kernel32::read_process_memory(self.handle.raw(), address.as_usize(), buffer) }
    }

    pub fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        unsafe { kernel32::write_process_memory(self.handle.raw(), address.as_usize(), data) }
    }

    /// Every region from address zero to the top of user space
    pub fn regions(&self) -> MemoryResult<Vec<RegionInfo>> {
        Ok(RegionEnumerator::new(self.handle.raw()).collect())
    }
}
