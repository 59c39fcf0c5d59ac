//! Attached Linux process backed by an open `/proc/<pid>/mem`

use super::procfs;
use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use crate::memory::regions::RegionInfo;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::FileExt;

/// Open memory file of a live Linux process.
///
/// The file descriptor is the owned handle and is closed when this value
/// drops.
pub struct LinuxProcess {
    pid: ProcessId,
    mem: File,
}

impl LinuxProcess {
    /// Opens the memory of `pid` for reading and writing, then checks that
    /// the process has not exited.
    pub fn open(pid: ProcessId) -> MemoryResult<Self> {
        let mem = OpenOptions::new()
            .read(true)
            .write(true)
            .open(procfs::proc_path(pid, "mem"))
            .map_err(|e| MemoryError::process_unavailable(pid, e.to_string()))?;

        match procfs::read_state(pid) {
            Ok(state) if procfs::is_live_state(state) => Ok(LinuxProcess { pid, mem }),
            _ => Err(MemoryError::ProcessNotRunning(pid)),
        }
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Command name from `comm`
    pub fn name(&self) -> MemoryResult<String> {
        procfs::read_comm(self.pid)
    }

    pub fn base_address(&self) -> MemoryResult<Address> {
        procfs::executable_base(self.pid)
    }

    /// Reads as much of `buffer` as is mapped. Fails only when nothing at
    /// `address` could be read.
    pub fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        let mut filled = 0;

        while filled < buffer.len() {
            let offset = address.as_usize().wrapping_add(filled) as u64;
            match self.mem.read_at(&mut buffer[filled..], offset) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if filled == 0 => {
                    return Err(MemoryError::address_out_of_range(address, e.to_string()))
                }
                Err(_) => break,
            }
        }

        Ok(filled)
    }

    pub fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        let mut written = 0;

        while written < data.len() {
            let offset = address.as_usize().wrapping_add(written) as u64;
            match self.mem.write_at(&data[written..], offset) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if written == 0 => {
                    return Err(MemoryError::address_out_of_range(address, e.to_string()))
                }
                Err(_) => break,
            }
        }

        Ok(written)
    }

    /// Regions from `maps`, classified like the Windows region model
    pub fn regions(&self) -> MemoryResult<Vec<RegionInfo>> {
        Ok(procfs::classify(&procfs::read_maps(self.pid)?))
    }
}
