//! Owned handle to an attached target process

use super::ProcessMemory;
use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use crate::memory::regions::RegionInfo;
use std::fmt;
use tracing::{info, warn};

#[cfg(target_os = "linux")]
use crate::linux::LinuxProcess as SystemProcess;
#[cfg(windows)]
use crate::windows::WindowsProcess as SystemProcess;

/// Exclusive handle to a live process other than this one.
///
/// The OS handle is released exactly once, when this value drops.
pub struct ProcessHandle {
    process: SystemProcess,
    name: String,
    base_address: Address,
}

impl ProcessHandle {
    /// Opens `pid` for reading and writing.
    ///
    /// Refuses this process's own pid. Fails with
    /// [`MemoryError::ProcessUnavailable`] when the OS denies access and
    /// [`MemoryError::ProcessNotRunning`] when the process has exited.
    pub fn open(pid: ProcessId) -> MemoryResult<Self> {
        if pid == std::process::id() {
            return Err(MemoryError::SelfAttachRefused(pid));
        }

        let process = SystemProcess::open(pid)?;

        let name = process.name().unwrap_or_else(|e| {
            warn!("Could not resolve name of process {}: {}", pid, e);
            String::from("<unknown>")
        });
        let base_address = process.base_address().unwrap_or_else(|e| {
            warn!("Could not resolve base address of process {}: {}", pid, e);
            Address::null()
        });

        info!("Attached to process {} ({}) at {}", pid, name, base_address);

        Ok(ProcessHandle {
            process,
            name,
            base_address,
        })
    }

    /// Get the process ID
    pub fn pid(&self) -> ProcessId {
        self.process.pid()
    }

    /// Executable name resolved at attach time
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load address of the main executable, null if it could not be resolved
    pub fn base_address(&self) -> Address {
        self.base_address
    }
}

impl ProcessMemory for ProcessHandle {
    fn pid(&self) -> ProcessId {
        self.process.pid()
    }

    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        self.process.read_into(address, buffer)
    }

    fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        self.process.write_from(address, data)
    }

    fn regions(&self) -> MemoryResult<Vec<RegionInfo>> {
        self.process.regions()
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        info!("Detached from process {}", self.process.pid());
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.process.pid())
            .field("name", &self.name)
            .field("base_address", &self.base_address)
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessHandle(pid={}, name={})",
            self.process.pid(),
            self.name
        )
    }
}
