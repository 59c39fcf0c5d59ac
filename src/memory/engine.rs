//! Scan and filter passes over an attached process

use super::list::AddressList;
use super::region::TypedRegion;
use super::regions::RegionType;
use crate::core::types::{
    Address, Comparison, MemoryError, MemoryResult, MemoryValue, ProcessId, Scalar, ValueType,
};
use crate::process::{ProcessHandle, ProcessMemory};
use tracing::{debug, trace, warn};

/// Largest raw read accepted by [`MemoryEngine::read_bytes`]
pub const MAX_READ_BYTES: usize = 16 * 1024 * 1024;

/// Options for the initial scan pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Step by the element size instead of by single bytes
    pub aligned: bool,
    /// Treat committed file mappings as candidates alongside private memory
    pub include_mapped: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            aligned: true,
            include_mapped: true,
        }
    }
}

/// Scan, filter, read and write over one process.
///
/// The engine holds no scan state: `scan` hands out a list and each
/// `filter` call takes one list and returns a new one.
pub struct MemoryEngine<P: ProcessMemory = ProcessHandle> {
    process: P,
}

impl MemoryEngine<ProcessHandle> {
    /// Attaches to `pid`
    pub fn attach(pid: ProcessId) -> MemoryResult<Self> {
        Ok(MemoryEngine::new(ProcessHandle::open(pid)?))
    }
}

impl<P: ProcessMemory> MemoryEngine<P> {
    pub fn new(process: P) -> Self {
        MemoryEngine { process }
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    pub fn into_inner(self) -> P {
        self.process
    }

    /// Builds the initial candidate list from every committed private or
    /// mapped region
    pub fn scan<T: Scalar>(&self, aligned: bool) -> MemoryResult<AddressList<T>> {
        self.scan_with(&ScanOptions {
            aligned,
            ..ScanOptions::default()
        })
    }

    pub fn scan_with<T: Scalar>(&self, options: &ScanOptions) -> MemoryResult<AddressList<T>> {
        let mut list = AddressList::new(options.aligned);
        let mut skipped = 0usize;

        for info in self.process.regions()? {
            let wanted = info.is_scan_target()
                && (options.include_mapped || info.region_type != RegionType::Mapped);
            if !wanted {
                trace!("Skipping region {}", info);
                skipped += 1;
                continue;
            }

            // A trailing partial stride holds no candidate
            let span = info.size - info.size % list.stride();
            let added = TypedRegion::new(info.base_address, span)
                .and_then(|region| list.add_region(region));
            if let Err(e) = added {
                warn!("Ignoring region {}: {}", info, e);
                skipped += 1;
            }
        }

        debug!(
            "Scan for {} found {} regions, {} addresses ({} regions skipped)",
            T::VALUE_TYPE,
            list.region_count(),
            list.size(),
            skipped
        );

        Ok(list)
    }

    /// Keeps the candidates whose current value satisfies
    /// `current <comparison> value`
    pub fn filter<T: Scalar>(
        &self,
        list: &AddressList<T>,
        comparison: Comparison,
        value: T,
    ) -> MemoryResult<AddressList<T>> {
        self.filter_by(list, |current| current.compare(value, comparison))
    }

    /// Keeps the candidates whose current value satisfies `predicate`.
    ///
    /// Each region is read with one bulk read. A region that cannot be read
    /// at all is dropped; after a short read only the complete values are
    /// evaluated. The input list is left untouched.
    pub fn filter_by<T, F>(&self, list: &AddressList<T>, predicate: F) -> MemoryResult<AddressList<T>>
    where
        T: Scalar,
        F: Fn(T) -> bool,
    {
        let stride = list.stride();
        let mut filtered = AddressList::with_stride(stride)?;
        let mut buffer = Vec::new();
        let mut unreadable = 0usize;

        for region in list.regions() {
            let span = region.size();
            // Widen the read so the value at the last candidate is complete
            buffer.resize(span + T::SIZE.saturating_sub(stride), 0);

            let read = match self.process.read_into(region.start(), &mut buffer) {
                Ok(read) => read,
                Err(e) => {
                    trace!("Dropping unreadable region {}: {}", region, e);
                    unreadable += 1;
                    continue;
                }
            };

            for offset in (0..span).step_by(stride) {
                let end = offset + T::SIZE;
                if end > read {
                    break;
                }
                if let Some(current) = T::decode(&buffer[offset..end]) {
                    if predicate(current) {
                        filtered.add_address(region.start().wrapping_add(offset))?;
                    }
                }
            }
        }

        filtered.merge_regions();

        debug!(
            "Filter kept {} of {} addresses in {} regions ({} unreadable)",
            filtered.size(),
            list.size(),
            filtered.region_count(),
            unreadable
        );

        Ok(filtered)
    }

    pub fn read<T: Scalar>(&self, address: Address) -> MemoryResult<T> {
        self.process.read(address)
    }

    pub fn write<T: Scalar>(&self, address: Address, value: T) -> MemoryResult<()> {
        self.process.write(address, value)
    }

    /// Reads a value whose type is only known at runtime
    pub fn read_value(&self, address: Address, value_type: ValueType) -> MemoryResult<MemoryValue> {
        let mut raw = vec![0u8; value_type.size()];
        self.process.read_exact(address, &mut raw)?;
        MemoryValue::from_bytes(&raw, value_type)
            .ok_or_else(|| MemoryError::size_mismatch(address, value_type.size(), raw.len()))
    }

    pub fn write_value(&self, address: Address, value: &MemoryValue) -> MemoryResult<()> {
        self.process.write_all(address, &value.to_bytes())
    }

    /// Up to `len` raw bytes at `address`, cut short where memory ends.
    ///
    /// Fails with [`MemoryError::ReadTooLarge`] above [`MAX_READ_BYTES`].
    pub fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>> {
        if len > MAX_READ_BYTES {
            return Err(MemoryError::ReadTooLarge {
                requested: len,
                limit: MAX_READ_BYTES,
            });
        }

        let mut raw = vec![0u8; len];
        let read = self.process.read_into(address, &mut raw)?;
        raw.truncate(read);
        Ok(raw)
    }
}
