//! Scanning and filtering of process memory
//!
//! This module provides:
//! - Typed regions and the candidate [`AddressList`]
//! - The [`MemoryEngine`] scan and filter passes
//! - OS region descriptions shared by both backends
//! - A runtime-typed [`ScanSession`] for interactive drivers

pub mod engine;
pub mod list;
pub mod region;
pub mod regions;
pub mod session;

pub use engine::{MemoryEngine, ScanOptions, MAX_READ_BYTES};
pub use list::AddressList;
pub use region::TypedRegion;
pub use regions::{RegionInfo, RegionState, RegionType};
pub use session::{AddressPreview, ListStats, ScanSession};
