//! Core type definitions for memory-modder
//!
//! Address wrappers, scalar element types, comparison kinds and the error
//! taxonomy shared by every other module.

mod address;
mod comparison;
mod error;
mod value;

// Re-export all public types
pub use address::Address;
pub use comparison::{Comparison, FLOAT_TOLERANCE};
pub use error::{MemoryError, MemoryResult};
pub use value::{MemoryValue, Scalar, ValueType};

// Common type aliases
pub type ProcessId = u32;
pub type Size = usize;
