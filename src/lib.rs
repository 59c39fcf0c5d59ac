//! memory-modder: scan, filter and modify the memory of a running process
//!
//! Attach with [`memory::MemoryEngine::attach`], build a candidate list with
//! `scan`, narrow it with repeated `filter` passes and finally `read` or
//! `write` the addresses that remain.

#![allow(dead_code)]

pub mod config;
pub mod core;
pub mod memory;
pub mod process;

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use crate::core::types::{
    Address, Comparison, MemoryError, MemoryResult, MemoryValue, ProcessId, Scalar, ValueType,
    FLOAT_TOLERANCE,
};
pub use memory::{AddressList, MemoryEngine, ScanOptions, ScanSession, TypedRegion};
pub use process::{ProcessHandle, ProcessMemory};

// Re-export core directly for full access
pub use crate::core::{AUTHORS, VERSION};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(AUTHORS, env!("CARGO_PKG_AUTHORS"));
    }

    #[test]
    fn test_address_reexport() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.as_usize(), 0x1000);
        assert!(Address::null().is_null());
    }

    #[test]
    fn test_memory_value_reexport() {
        let value = MemoryValue::U32(42);
        assert_eq!(value.value_type(), ValueType::U32);
        assert_eq!(value.size(), 4);

        let f64_val = MemoryValue::F64(std::f64::consts::PI);
        assert_eq!(f64_val.value_type(), ValueType::F64);
    }

    #[test]
    fn test_memory_result_reexport() {
        let result: MemoryResult<u32> = Ok(42);
        assert!(result.is_ok());

        let error_result: MemoryResult<u32> = Err(MemoryError::InvalidStride);
        assert!(error_result.is_err());
    }
}
