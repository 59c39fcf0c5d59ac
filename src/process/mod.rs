//! Access to another process's memory
//!
//! [`ProcessMemory`] is the seam between the scanning engine and the
//! operating system. [`ProcessHandle`] implements it for a real attached
//! process; anything else that can serve byte reads, byte writes and a
//! region list can stand in for it.

pub mod handle;

pub use handle::ProcessHandle;

use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId, Scalar};
use crate::memory::regions::RegionInfo;

/// Largest scalar width, in bytes
const MAX_SCALAR_SIZE: usize = 8;

/// Raw and typed access to the memory of one process
pub trait ProcessMemory {
    fn pid(&self) -> ProcessId;

    /// Copies bytes at `address` into `buffer`.
    ///
    /// Returns the number of bytes copied, which may be less than
    /// `buffer.len()` when the range runs into unmapped memory. Fails with
    /// [`MemoryError::AddressOutOfRange`] when nothing could be read.
    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize>;

    /// Copies `data` to `address`; same short-transfer rules as `read_into`
    fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize>;

    /// Regions of the address space in ascending order
    fn regions(&self) -> MemoryResult<Vec<RegionInfo>>;

    /// Fills all of `buffer` or fails with [`MemoryError::SizeMismatch`]
    fn read_exact(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<()> {
        let read = self.read_into(address, buffer)?;
        if read != buffer.len() {
            return Err(MemoryError::size_mismatch(address, buffer.len(), read));
        }
        Ok(())
    }

    /// Writes all of `data` or fails with [`MemoryError::SizeMismatch`]
    fn write_all(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        let written = self.write_from(address, data)?;
        if written != data.len() {
            return Err(MemoryError::size_mismatch(address, data.len(), written));
        }
        Ok(())
    }

    fn read<T: Scalar>(&self, address: Address) -> MemoryResult<T> {
        let mut raw = [0u8; MAX_SCALAR_SIZE];
        let window = &mut raw[..T::SIZE];
        self.read_exact(address, window)?;
        T::decode(window).ok_or_else(|| MemoryError::size_mismatch(address, T::SIZE, 0))
    }

    fn write<T: Scalar>(&self, address: Address, value: T) -> MemoryResult<()> {
        self.write_all(address, &value.encode())
    }

    /// Reads `buffer.len()` consecutive values starting at `address`
    fn read_bulk<T: Scalar>(&self, address: Address, buffer: &mut [T]) -> MemoryResult<()> {
        let mut raw = vec![0u8; buffer.len() * T::SIZE];
        self.read_exact(address, &mut raw)?;

        for (slot, window) in buffer.iter_mut().zip(raw.chunks_exact(T::SIZE)) {
            if let Some(value) = T::decode(window) {
                *slot = value;
            }
        }
        Ok(())
    }

    /// Writes every value in `values` consecutively starting at `address`
    fn write_bulk<T: Scalar>(&self, address: Address, values: &[T]) -> MemoryResult<()> {
        let raw: Vec<u8> = values.iter().flat_map(|v| v.encode()).collect();
        self.write_all(address, &raw)
    }
}
