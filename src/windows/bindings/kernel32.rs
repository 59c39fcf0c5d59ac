//! Kernel32.dll bindings for process and memory operations

use crate::core::types::{MemoryError, MemoryResult};
use std::mem;
use winapi::shared::minwindef::{DWORD, FALSE, LPCVOID, LPVOID};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::{ReadProcessMemory, VirtualQueryEx, WriteProcessMemory};
use winapi::um::minwinbase::STILL_ACTIVE;
use winapi::um::processthreadsapi::{GetExitCodeProcess, OpenProcess};
use winapi::um::winnt::{HANDLE, MEMORY_BASIC_INFORMATION, PROCESS_ALL_ACCESS};

/// Last OS error as a `windows` crate error
fn last_error() -> ::windows::core::Error {
    ::windows::core::Error::from_win32()
}

/// Safe wrapper for OpenProcess with all access
pub fn open_process_all_access(pid: u32) -> MemoryResult<HANDLE> {
    let handle = unsafe { OpenProcess(PROCESS_ALL_ACCESS, FALSE, pid) };
    if handle.is_null() {
        Err(MemoryError::process_unavailable(pid, last_error().message().to_string()))
    } else {
        Ok(handle)
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle that is not closed elsewhere
pub unsafe fn close_handle(handle: HANDLE) -> MemoryResult<()> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(last_error().into())
    } else {
        Ok(())
    }
}

/// Whether the process behind `handle` has not exited yet
///
/// # Safety
/// The handle must be a valid process handle with query access
pub unsafe fn is_process_active(handle: HANDLE) -> MemoryResult<bool> {
    let mut exit_code: DWORD = 0;
    if GetExitCodeProcess(handle, &mut exit_code) == FALSE {
        return Err(last_error().into());
    }
    Ok(exit_code == STILL_ACTIVE)
}

/// Safe wrapper for ReadProcessMemory.
///
/// A partial copy that transferred at least one byte is reported as
/// `Ok(bytes_read)`.
///
/// # Safety
/// The handle must be a valid process handle with appropriate access rights
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: usize,
    buffer: &mut [u8],
) -> MemoryResult<usize> {
    let mut bytes_read = 0;

    let result = ReadProcessMemory(
        handle,
        address as LPCVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE && bytes_read == 0 {
        Err(MemoryError::address_out_of_range(
            address,
            last_error().message().to_string(),
        ))
    } else {
        Ok(bytes_read)
    }
}

/// Safe wrapper for WriteProcessMemory
///
/// # Safety
/// The handle must be a valid process handle with appropriate access rights
pub unsafe fn write_process_memory(
    handle: HANDLE,
    address: usize,
    data: &[u8],
) -> MemoryResult<usize> {
    let mut bytes_written = 0;

    let result = WriteProcessMemory(
        handle,
        address as LPVOID,
        data.as_ptr() as LPCVOID,
        data.len(),
        &mut bytes_written,
    );

    if result == FALSE && bytes_written == 0 {
        Err(MemoryError::address_out_of_range(
            address,
            last_error().message().to_string(),
        ))
    } else {
        Ok(bytes_written)
    }
}

/// Safe wrapper for VirtualQueryEx
///
/// # Safety
/// The handle must be a valid process handle with appropriate access rights
pub unsafe fn virtual_query_ex(
    handle: HANDLE,
    address: usize,
) -> MemoryResult<MEMORY_BASIC_INFORMATION> {
    let mut mbi: MEMORY_BASIC_INFORMATION = mem::zeroed();

    let result = VirtualQueryEx(
        handle,
        address as LPCVOID,
        &mut mbi,
        mem::size_of::<MEMORY_BASIC_INFORMATION>(),
    );

    if result == 0 {
        Err(MemoryError::RegionQuery(format!(
            "VirtualQueryEx failed for address 0x{:X}: {}",
            address,
            last_error().message()
        )))
    } else {
        Ok(mbi)
    }
}
