//! Owned HANDLE with automatic cleanup

use crate::windows::bindings::kernel32;
use winapi::um::winnt::HANDLE;

/// Owned Windows HANDLE, closed exactly once on drop
pub struct Handle {
    handle: HANDLE,
}

impl Handle {
    /// Takes ownership of `handle`
    pub fn new(handle: HANDLE) -> Self {
        Handle { handle }
    }

    /// Check if handle is null
    pub fn is_null(&self) -> bool {
        self.handle.is_null()
    }

    /// Get the raw handle. It stays owned by this wrapper.
    pub fn raw(&self) -> HANDLE {
        self.handle
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            if let Err(e) = unsafe { kernel32::close_handle(self.handle) } {
                tracing::warn!("Failed to close process handle: {}", e);
            }
            self.handle = std::ptr::null_mut();
        }
    }
}

// Send + Sync are safe because HANDLEs are process-local
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}
