//! Error taxonomy for attach, memory access and address-list operations

use super::Address;
use thiserror::Error;

/// Main error type for memory operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Refusing to attach to own process (pid {0})")]
    SelfAttachRefused(u32),

    #[error("Process {pid} cannot be opened: {reason}")]
    ProcessUnavailable { pid: u32, reason: String },

    #[error("Process {0} has stopped running")]
    ProcessNotRunning(u32),

    #[error("Address {address} is out of range: {reason}")]
    AddressOutOfRange { address: Address, reason: String },

    #[error("Size mismatch at {address}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        address: Address,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid region at {start} with size {size}")]
    InvalidRegion { start: Address, size: usize },

    #[error("Region at {start} starts before the end of the previous region ({previous_end})")]
    UnorderedRegion {
        start: Address,
        previous_end: Address,
    },

    #[error("Stride must be between 1 and the element size")]
    InvalidStride,

    #[error("Read of {requested} bytes exceeds the limit of {limit}")]
    ReadTooLarge { requested: usize, limit: usize },

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Invalid {value_type} value: {input}")]
    InvalidValue { value_type: String, input: String },

    #[error("Invalid value type: {0}")]
    InvalidValueType(String),

    #[error("Invalid comparison: {0}")]
    InvalidComparison(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Region query failed: {0}")]
    RegionQuery(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] ::windows::core::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates a process unavailable error
    pub fn process_unavailable(pid: u32, reason: impl Into<String>) -> Self {
        MemoryError::ProcessUnavailable {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates an address out of range error
    pub fn address_out_of_range(address: impl Into<Address>, reason: impl Into<String>) -> Self {
        MemoryError::AddressOutOfRange {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Creates a size mismatch error
    pub fn size_mismatch(address: impl Into<Address>, expected: usize, actual: usize) -> Self {
        MemoryError::SizeMismatch {
            address: address.into(),
            expected,
            actual,
        }
    }

    /// Creates an invalid value error for text that failed to parse
    pub fn invalid_value(value_type: impl ToString, input: impl Into<String>) -> Self {
        MemoryError::InvalidValue {
            value_type: value_type.to_string(),
            input: input.into(),
        }
    }

    /// True for failures local to one read or write: the address is not
    /// safely accessible right now.
    pub fn is_access_failure(&self) -> bool {
        matches!(
            self,
            MemoryError::AddressOutOfRange { .. } | MemoryError::SizeMismatch { .. }
        )
    }

    /// True for failures that abort an attach attempt
    pub fn is_attach_failure(&self) -> bool {
        matches!(
            self,
            MemoryError::SelfAttachRefused(_)
                | MemoryError::ProcessUnavailable { .. }
                | MemoryError::ProcessNotRunning(_)
        )
    }

    /// Short message suitable for showing to an interactive user
    pub fn user_message(&self) -> String {
        match self {
            MemoryError::SelfAttachRefused(_) | MemoryError::ProcessUnavailable { .. } => {
                "The process cannot be used.".to_string()
            }
            MemoryError::ProcessNotRunning(_) => "The process has stopped running.".to_string(),
            MemoryError::AddressOutOfRange { .. } | MemoryError::SizeMismatch { .. } => {
                "Address is out of accessible process range.".to_string()
            }
            other => other.to_string(),
        }
    }
}
