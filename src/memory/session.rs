//! Runtime-typed scan session
//!
//! A [`ScanSession`] holds the current candidate list for a value type chosen
//! at runtime and tracks how each filter pass narrowed it.

use super::engine::{MemoryEngine, ScanOptions};
use super::list::AddressList;
use crate::core::types::{
    Address, Comparison, MemoryError, MemoryResult, MemoryValue, Scalar, ValueType,
};
use crate::process::ProcessMemory;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Address list for one of the scannable types
#[derive(Debug, Clone)]
enum TypedList {
    I8(AddressList<i8>),
    I16(AddressList<i16>),
    I32(AddressList<i32>),
    I64(AddressList<i64>),
    U8(AddressList<u8>),
    U16(AddressList<u16>),
    U32(AddressList<u32>),
    U64(AddressList<u64>),
    F32(AddressList<f32>),
    F64(AddressList<f64>),
}

/// Evaluates `$body` with `$list` bound to the inner list
macro_rules! with_list {
    ($typed:expr, $list:ident => $body:expr) => {
        match $typed {
            TypedList::I8($list) => $body,
            TypedList::I16($list) => $body,
            TypedList::I32($list) => $body,
            TypedList::I64($list) => $body,
            TypedList::U8($list) => $body,
            TypedList::U16($list) => $body,
            TypedList::U32($list) => $body,
            TypedList::U64($list) => $body,
            TypedList::F32($list) => $body,
            TypedList::F64($list) => $body,
        }
    };
}

/// Like `with_list!`, wrapping the resulting list back into the same variant
macro_rules! map_list {
    ($typed:expr, $list:ident => $body:expr) => {
        match $typed {
            TypedList::I8($list) => TypedList::I8($body),
            TypedList::I16($list) => TypedList::I16($body),
            TypedList::I32($list) => TypedList::I32($body),
            TypedList::I64($list) => TypedList::I64($body),
            TypedList::U8($list) => TypedList::U8($body),
            TypedList::U16($list) => TypedList::U16($body),
            TypedList::U32($list) => TypedList::U32($body),
            TypedList::U64($list) => TypedList::U64($body),
            TypedList::F32($list) => TypedList::F32($body),
            TypedList::F64($list) => TypedList::F64($body),
        }
    };
}

impl TypedList {
    fn scan<P: ProcessMemory>(
        engine: &MemoryEngine<P>,
        value_type: ValueType,
        options: &ScanOptions,
    ) -> MemoryResult<Self> {
        Ok(match value_type {
            ValueType::I8 => TypedList::I8(engine.scan_with(options)?),
            ValueType::I16 => TypedList::I16(engine.scan_with(options)?),
            ValueType::I32 => TypedList::I32(engine.scan_with(options)?),
            ValueType::I64 => TypedList::I64(engine.scan_with(options)?),
            ValueType::U8 => TypedList::U8(engine.scan_with(options)?),
            ValueType::U16 => TypedList::U16(engine.scan_with(options)?),
            ValueType::U32 => TypedList::U32(engine.scan_with(options)?),
            ValueType::U64 => TypedList::U64(engine.scan_with(options)?),
            ValueType::F32 => TypedList::F32(engine.scan_with(options)?),
            ValueType::F64 => TypedList::F64(engine.scan_with(options)?),
        })
    }

    fn value_type(&self) -> ValueType {
        with_list!(self, list => value_type_of(list))
    }
}

fn value_type_of<T: Scalar>(_: &AddressList<T>) -> ValueType {
    T::VALUE_TYPE
}

fn filter_list<T: Scalar, P: ProcessMemory>(
    engine: &MemoryEngine<P>,
    list: &AddressList<T>,
    comparison: Comparison,
    value: &MemoryValue,
) -> MemoryResult<AddressList<T>> {
    let target = T::from_value(value).ok_or_else(|| MemoryError::TypeMismatch {
        expected: T::VALUE_TYPE.to_string(),
        actual: value.value_type().to_string(),
    })?;
    engine.filter(list, comparison, target)
}

/// Summary of the current candidate list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListStats {
    pub value_type: ValueType,
    /// Candidate addresses left
    pub addresses: usize,
    /// Bytes covered by the candidates
    pub bytes: usize,
    pub fragmentation: f32,
    /// Candidates removed by the most recent filter pass
    pub eliminated: usize,
    /// Filter passes run since the scan
    pub passes: usize,
}

impl fmt::Display for ListStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} addresses ({} bytes, fragmentation {:.4}) of {}, {} eliminated after {} passes",
            self.addresses,
            self.bytes,
            self.fragmentation,
            self.value_type,
            self.eliminated,
            self.passes
        )
    }
}

/// A candidate address with its value at preview time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressPreview {
    pub address: Address,
    /// `None` when the address could not be read
    pub value: Option<MemoryValue>,
}

/// Scan followed by any number of filter passes, for one value type
#[derive(Debug, Clone)]
pub struct ScanSession {
    list: TypedList,
    previous_size: usize,
    passes: usize,
}

impl ScanSession {
    /// Scans the process for candidates of `value_type`
    pub fn start<P: ProcessMemory>(
        engine: &MemoryEngine<P>,
        value_type: ValueType,
        aligned: bool,
    ) -> MemoryResult<Self> {
        Self::start_with(
            engine,
            value_type,
            &ScanOptions {
                aligned,
                ..ScanOptions::default()
            },
        )
    }

    pub fn start_with<P: ProcessMemory>(
        engine: &MemoryEngine<P>,
        value_type: ValueType,
        options: &ScanOptions,
    ) -> MemoryResult<Self> {
        let list = TypedList::scan(engine, value_type, options)?;
        let size = with_list!(&list, l => l.size());

        info!("Scan for {} found {} addresses", value_type, size);

        Ok(ScanSession {
            list,
            previous_size: size,
            passes: 0,
        })
    }

    /// Narrows the candidates to those satisfying `current <comparison> value`.
    ///
    /// `value` must be of the session's type.
    pub fn filter<P: ProcessMemory>(
        &mut self,
        engine: &MemoryEngine<P>,
        comparison: Comparison,
        value: &MemoryValue,
    ) -> MemoryResult<ListStats> {
        if value.value_type() != self.value_type() {
            return Err(MemoryError::TypeMismatch {
                expected: self.value_type().to_string(),
                actual: value.value_type().to_string(),
            });
        }

        let filtered = map_list!(&self.list, l => filter_list(engine, l, comparison, value)?);

        self.previous_size = self.size();
        self.list = filtered;
        self.passes += 1;

        info!(
            "Filter {} {} kept {} of {} addresses",
            comparison,
            value,
            self.size(),
            self.previous_size
        );

        Ok(self.stats())
    }

    pub fn value_type(&self) -> ValueType {
        self.list.value_type()
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Candidate addresses left
    pub fn size(&self) -> usize {
        with_list!(&self.list, l => l.size())
    }

    pub fn contains(&self, address: Address) -> bool {
        with_list!(&self.list, l => l.contains(address))
    }

    pub fn stats(&self) -> ListStats {
        let (addresses, bytes, fragmentation) =
            with_list!(&self.list, l => (l.size(), l.byte_size(), l.fragmentation()));

        ListStats {
            value_type: self.value_type(),
            addresses,
            bytes,
            fragmentation,
            eliminated: self.previous_size.saturating_sub(addresses),
            passes: self.passes,
        }
    }

    /// First `count` candidates with their current values
    pub fn preview<P: ProcessMemory>(
        &self,
        engine: &MemoryEngine<P>,
        count: usize,
    ) -> Vec<AddressPreview> {
        let value_type = self.value_type();
        with_list!(&self.list, l => l.first_addresses(count))
            .into_iter()
            .map(|address| AddressPreview {
                address,
                value: engine.read_value(address, value_type).ok(),
            })
            .collect()
    }
}
