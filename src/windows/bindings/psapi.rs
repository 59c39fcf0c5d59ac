//! PSAPI.dll bindings for module lookups

use crate::core::types::{MemoryError, MemoryResult};
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use winapi::shared::minwindef::{FALSE, HMODULE, MAX_PATH};
use winapi::um::psapi::{EnumProcessModules, GetModuleBaseNameW};
use winapi::um::winnt::HANDLE;

/// First module of the process, which is its main executable
///
/// # Safety
/// The handle must be a valid process handle
pub unsafe fn main_module(handle: HANDLE) -> MemoryResult<HMODULE> {
    let mut module: HMODULE = std::ptr::null_mut();
    let mut bytes_needed = 0u32;

    let result = EnumProcessModules(
        handle,
        &mut module,
        std::mem::size_of::<HMODULE>() as u32,
        &mut bytes_needed,
    );

    if result == FALSE || module.is_null() {
        return Err(::windows::core::Error::from_win32().into());
    }

    Ok(module)
}

/// Safe wrapper for GetModuleBaseNameW. A null module names the executable.
///
/// # Safety
/// The handle must be a valid process handle and module must be valid or null
pub unsafe fn get_module_base_name(handle: HANDLE, module: HMODULE) -> MemoryResult<String> {
    let mut buffer = vec![0u16; MAX_PATH];

    let length = GetModuleBaseNameW(handle, module, buffer.as_mut_ptr(), MAX_PATH as u32);

    if length == 0 {
        return Err(::windows::core::Error::from_win32().into());
    }

    buffer.truncate(length as usize);

    OsString::from_wide(&buffer)
        .into_string()
        .map_err(|raw| MemoryError::RegionQuery(format!("Invalid module name encoding: {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_null_handle_operations() {
        unsafe {
            assert!(main_module(ptr::null_mut()).is_err());
            assert!(get_module_base_name(ptr::null_mut(), ptr::null_mut()).is_err());
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_current_process_module() {
        unsafe {
            let current = winapi::um::processthreadsapi::GetCurrentProcess();
            let module = main_module(current).unwrap();
            assert!(!module.is_null());
            let name = get_module_base_name(current, ptr::null_mut()).unwrap();
            assert!(name.to_lowercase().ends_with(".exe"));
        }
    }
}
