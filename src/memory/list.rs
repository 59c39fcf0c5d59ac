//! Ordered candidate-address set built from typed regions

use super::region::TypedRegion;
use crate::core::types::{Address, MemoryError, MemoryResult, Scalar};
use std::fmt;

/// Candidate addresses for a scan, stored as ascending non-overlapping
/// regions that share one stride.
///
/// Every `stride`-th byte offset inside a region is a candidate. The list is
/// the value threaded through successive filter passes; filtering always
/// builds a fresh list.
#[derive(Clone)]
pub struct AddressList<T: Scalar> {
    regions: Vec<TypedRegion<T>>,
    stride: usize,
}

impl<T: Scalar> AddressList<T> {
    /// Creates an empty list. Aligned lists step by `T::SIZE`, unaligned
    /// lists by a single byte.
    pub fn new(aligned: bool) -> Self {
        AddressList {
            regions: Vec::new(),
            stride: if aligned { T::SIZE } else { 1 },
        }
    }

    /// Creates an empty list with an explicit stride, at most `T::SIZE`
    pub fn with_stride(stride: usize) -> MemoryResult<Self> {
        if stride == 0 || stride > T::SIZE {
            return Err(MemoryError::InvalidStride);
        }

        Ok(AddressList {
            regions: Vec::new(),
            stride,
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn regions(&self) -> &[TypedRegion<T>] {
        &self.regions
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Appends a region. It must not start before the end of the last one,
    /// and its size must be a multiple of the stride.
    pub fn add_region(&mut self, region: TypedRegion<T>) -> MemoryResult<()> {
        if region.size() % self.stride != 0 {
            return Err(MemoryError::InvalidRegion {
                start: region.start(),
                size: region.size(),
            });
        }

        if let Some(last) = self.regions.last() {
            if region.start() < last.end() {
                return Err(MemoryError::UnorderedRegion {
                    start: region.start(),
                    previous_end: last.end(),
                });
            }
        }

        self.regions.push(region);
        Ok(())
    }

    /// Appends a single candidate, one stride wide
    pub fn add_address(&mut self, address: Address) -> MemoryResult<()> {
        let region = TypedRegion::new(address, self.stride)?;
        self.add_region(region)
    }

    /// Number of candidate addresses
    pub fn size(&self) -> usize {
        self.regions.iter().map(TypedRegion::size).sum::<usize>() / self.stride
    }

    /// Bytes covered by the candidates
    pub fn byte_size(&self) -> usize {
        self.size() * self.stride
    }

    /// Regions per candidate address. 0 for an empty list, 1 when every
    /// candidate sits in its own region.
    pub fn fragmentation(&self) -> f32 {
        self.regions.len() as f32 / self.size().max(1) as f32
    }

    /// Lazily walks every candidate address in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        let stride = self.stride;
        self.regions
            .iter()
            .flat_map(move |region| region.addresses(stride))
    }

    pub fn all_addresses(&self) -> Vec<Address> {
        self.iter().collect()
    }

    /// First `count` candidate addresses, without walking the rest
    pub fn first_addresses(&self, count: usize) -> Vec<Address> {
        self.iter().take(count).collect()
    }

    /// Whether `address` is a candidate in this list
    pub fn contains(&self, address: Address) -> bool {
        let index = self.regions.partition_point(|r| r.end() <= address);
        match self.regions.get(index) {
            Some(region) if region.contains(address) => {
                (address.as_usize() - region.start().as_usize()) % self.stride == 0
            }
            _ => false,
        }
    }

    /// Coalesces contiguous neighbours in a single pass
    pub fn merge_regions(&mut self) {
        self.regions.dedup_by(|next, kept| {
            if kept.end() == next.start() {
                kept.set_end(next.end());
                true
            } else {
                false
            }
        });
    }
}

impl<T: Scalar> fmt::Debug for AddressList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressList")
            .field("value_type", &T::VALUE_TYPE)
            .field("stride", &self.stride)
            .field("regions", &self.regions.len())
            .field("addresses", &self.size())
            .finish()
    }
}
