//! Linux procfs layer for process memory access
//!
//! The process memory file stands in for a process handle, `maps` for the
//! region query and `stat` for the exit check.

pub mod process;
pub mod procfs;

pub use process::LinuxProcess;
