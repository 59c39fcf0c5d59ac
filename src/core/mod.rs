//! Core module containing fundamental types for memory-modder
//!
//! This module provides the building blocks used throughout the crate:
//! addresses, scalar values, comparisons and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{Address, Comparison, MemoryError, MemoryResult, MemoryValue, Scalar, ValueType};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

// Platform verification at compile time
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
compile_error!("memory-modder only supports Windows and Linux");
