//! Half-open address range tagged with an element type

use crate::core::types::{Address, MemoryError, MemoryResult, Scalar};
use std::fmt;
use std::marker::PhantomData;

/// A contiguous run of candidate bytes `[start, end)` in the target.
///
/// The element type only tags the region; it is never read through.
pub struct TypedRegion<T: Scalar> {
    start: Address,
    end: Address,
    _marker: PhantomData<T>,
}

impl<T: Scalar> TypedRegion<T> {
    /// Creates a region of `size` bytes starting at `start`.
    ///
    /// Fails with [`MemoryError::InvalidRegion`] for a zero size or when the
    /// end would overflow the address space.
    pub fn new(start: Address, size: usize) -> MemoryResult<Self> {
        let end = match start.checked_add(size) {
            Some(end) if size > 0 => end,
            _ => return Err(MemoryError::InvalidRegion { start, size }),
        };

        Ok(TypedRegion {
            start,
            end,
            _marker: PhantomData,
        })
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.end.as_usize() - self.start.as_usize()
    }

    pub fn contains(&self, address: Address) -> bool {
        address >= self.start && address < self.end
    }

    /// Candidate addresses in this region for the given stride
    pub fn addresses(&self, stride: usize) -> impl Iterator<Item = Address> + '_ {
        (self.start.as_usize()..self.end.as_usize())
            .step_by(stride.max(1))
            .map(Address::new)
    }

    /// Extends the region during merge
    pub(crate) fn set_end(&mut self, end: Address) {
        debug_assert!(end > self.start);
        self.end = end;
    }
}

impl<T: Scalar> Clone for TypedRegion<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Scalar> Copy for TypedRegion<T> {}

impl<T: Scalar> PartialEq for TypedRegion<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl<T: Scalar> Eq for TypedRegion<T> {}

impl<T: Scalar> fmt::Debug for TypedRegion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRegion")
            .field("value_type", &T::VALUE_TYPE)
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

impl<T: Scalar> fmt::Display for TypedRegion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}) {}", self.start, self.end, T::VALUE_TYPE)
    }
}
