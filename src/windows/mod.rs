//! Windows API layer for process memory access
//!
//! Provides safe wrappers around Windows API functions for process
//! and memory operations. All unsafe FFI calls are contained within
//! this module.

pub mod bindings;
pub mod process;
pub mod types;

pub use process::WindowsProcess;
pub use types::Handle;
