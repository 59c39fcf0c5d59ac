//! Primitive element types a scan can be parameterized over

use super::comparison::{Comparison, FLOAT_TOLERANCE};
use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Runtime tag for the closed set of scannable primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ValueType {
    pub const ALL: [ValueType; 10] = [
        ValueType::I8,
        ValueType::I16,
        ValueType::I32,
        ValueType::I64,
        ValueType::U8,
        ValueType::U16,
        ValueType::U32,
        ValueType::U64,
        ValueType::F32,
        ValueType::F64,
    ];

    /// Size in bytes
    pub const fn size(&self) -> usize {
        match self {
            ValueType::I8 | ValueType::U8 => 1,
            ValueType::I16 | ValueType::U16 => 2,
            ValueType::I32 | ValueType::U32 | ValueType::F32 => 4,
            ValueType::I64 | ValueType::U64 | ValueType::F64 => 8,
        }
    }

    pub const fn bit_size(&self) -> usize {
        self.size() * 8
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, ValueType::F32 | ValueType::F64)
    }

    /// Display name, e.g. `UInt16`
    pub const fn name(&self) -> &'static str {
        match self {
            ValueType::I8 => "Int8",
            ValueType::I16 => "Int16",
            ValueType::I32 => "Int32",
            ValueType::I64 => "Int64",
            ValueType::U8 => "UInt8",
            ValueType::U16 => "UInt16",
            ValueType::U32 => "UInt32",
            ValueType::U64 => "UInt64",
            ValueType::F32 => "Float32",
            ValueType::F64 => "Float64",
        }
    }

    /// Short name, e.g. `u16`
    pub const fn short_name(&self) -> &'static str {
        match self {
            ValueType::I8 => "i8",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::U8 => "u8",
            ValueType::U16 => "u16",
            ValueType::U32 => "u32",
            ValueType::U64 => "u64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
        }
    }
}

impl FromStr for ValueType {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ValueType::ALL
            .into_iter()
            .find(|vt| {
                vt.short_name().eq_ignore_ascii_case(wanted) || vt.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| MemoryError::InvalidValueType(wanted.to_string()))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value of one of the scannable types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum MemoryValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl MemoryValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            MemoryValue::I8(_) => ValueType::I8,
            MemoryValue::I16(_) => ValueType::I16,
            MemoryValue::I32(_) => ValueType::I32,
            MemoryValue::I64(_) => ValueType::I64,
            MemoryValue::U8(_) => ValueType::U8,
            MemoryValue::U16(_) => ValueType::U16,
            MemoryValue::U32(_) => ValueType::U32,
            MemoryValue::U64(_) => ValueType::U64,
            MemoryValue::F32(_) => ValueType::F32,
            MemoryValue::F64(_) => ValueType::F64,
        }
    }

    /// Size in bytes of the value
    pub fn size(&self) -> usize {
        self.value_type().size()
    }

    /// Native-endian encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MemoryValue::I8(v) => v.encode(),
            MemoryValue::I16(v) => v.encode(),
            MemoryValue::I32(v) => v.encode(),
            MemoryValue::I64(v) => v.encode(),
            MemoryValue::U8(v) => v.encode(),
            MemoryValue::U16(v) => v.encode(),
            MemoryValue::U32(v) => v.encode(),
            MemoryValue::U64(v) => v.encode(),
            MemoryValue::F32(v) => v.encode(),
            MemoryValue::F64(v) => v.encode(),
        }
    }

    /// Decodes the leading `value_type.size()` bytes, native-endian
    pub fn from_bytes(bytes: &[u8], value_type: ValueType) -> Option<Self> {
        match value_type {
            ValueType::I8 => i8::decode(bytes).map(MemoryValue::I8),
            ValueType::I16 => i16::decode(bytes).map(MemoryValue::I16),
            ValueType::I32 => i32::decode(bytes).map(MemoryValue::I32),
            ValueType::I64 => i64::decode(bytes).map(MemoryValue::I64),
            ValueType::U8 => u8::decode(bytes).map(MemoryValue::U8),
            ValueType::U16 => u16::decode(bytes).map(MemoryValue::U16),
            ValueType::U32 => u32::decode(bytes).map(MemoryValue::U32),
            ValueType::U64 => u64::decode(bytes).map(MemoryValue::U64),
            ValueType::F32 => f32::decode(bytes).map(MemoryValue::F32),
            ValueType::F64 => f64::decode(bytes).map(MemoryValue::F64),
        }
    }

    /// Parses user text as a value of `value_type`
    pub fn parse(input: &str, value_type: ValueType) -> MemoryResult<Self> {
        Ok(match value_type {
            ValueType::I8 => MemoryValue::I8(i8::parse_text(input)?),
            ValueType::I16 => MemoryValue::I16(i16::parse_text(input)?),
            ValueType::I32 => MemoryValue::I32(i32::parse_text(input)?),
            ValueType::I64 => MemoryValue::I64(i64::parse_text(input)?),
            ValueType::U8 => MemoryValue::U8(u8::parse_text(input)?),
            ValueType::U16 => MemoryValue::U16(u16::parse_text(input)?),
            ValueType::U32 => MemoryValue::U32(u32::parse_text(input)?),
            ValueType::U64 => MemoryValue::U64(u64::parse_text(input)?),
            ValueType::F32 => MemoryValue::F32(f32::parse_text(input)?),
            ValueType::F64 => MemoryValue::F64(f64::parse_text(input)?),
        })
    }
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::I8(v) => write!(f, "{}", v),
            MemoryValue::I16(v) => write!(f, "{}", v),
            MemoryValue::I32(v) => write!(f, "{}", v),
            MemoryValue::I64(v) => write!(f, "{}", v),
            MemoryValue::U8(v) => write!(f, "{}", v),
            MemoryValue::U16(v) => write!(f, "{}", v),
            MemoryValue::U32(v) => write!(f, "{}", v),
            MemoryValue::U64(v) => write!(f, "{}", v),
            MemoryValue::F32(v) => write!(f, "{}", v),
            MemoryValue::F64(v) => write!(f, "{}", v),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive element type that can be scanned for.
///
/// Implemented for the signed and unsigned integers of 8 to 64 bits and for
/// `f32`/`f64`. Integers compare exactly; floats compare with
/// [`FLOAT_TOLERANCE`]. Values are decoded from native-endian byte windows,
/// never by reinterpreting pointers.
pub trait Scalar:
    sealed::Sealed + Copy + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Width in bytes
    const SIZE: usize;
    /// Runtime tag
    const VALUE_TYPE: ValueType;

    /// Decodes the leading `SIZE` bytes; `None` if the slice is shorter
    fn decode(bytes: &[u8]) -> Option<Self>;

    /// Native-endian encoding
    fn encode(self) -> Vec<u8>;

    /// Evaluates `self <comparison> other` under this type's tolerance policy
    fn compare(self, other: Self, comparison: Comparison) -> bool;

    fn into_value(self) -> MemoryValue;

    /// Extracts a value of this type; `None` for any other variant
    fn from_value(value: &MemoryValue) -> Option<Self>;

    /// Parses user text
    fn parse_text(input: &str) -> MemoryResult<Self>;
}

macro_rules! impl_scalar_common {
    ($ty:ty, $variant:ident) => {
        impl sealed::Sealed for $ty {}

        const _: () = assert!(std::mem::size_of::<$ty>() == ValueType::$variant.size());
    };
}

macro_rules! impl_scalar_codec {
    ($ty:ty, $variant:ident) => {
        const SIZE: usize = std::mem::size_of::<$ty>();
        const VALUE_TYPE: ValueType = ValueType::$variant;

        fn decode(bytes: &[u8]) -> Option<Self> {
            let window: [u8; std::mem::size_of::<$ty>()] =
                bytes.get(..Self::SIZE)?.try_into().ok()?;
            Some(<$ty>::from_ne_bytes(window))
        }

        fn encode(self) -> Vec<u8> {
            self.to_ne_bytes().to_vec()
        }

        fn into_value(self) -> MemoryValue {
            MemoryValue::$variant(self)
        }

        fn from_value(value: &MemoryValue) -> Option<Self> {
            match value {
                MemoryValue::$variant(v) => Some(*v),
                _ => None,
            }
        }
    };
}

macro_rules! impl_int_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl_scalar_common!($ty, $variant);

            impl Scalar for $ty {
                impl_scalar_codec!($ty, $variant);

                fn compare(self, other: Self, comparison: Comparison) -> bool {
                    comparison.exact(self, other)
                }

                fn parse_text(input: &str) -> MemoryResult<Self> {
                    let text = input.trim();
                    let parsed = match text
                        .strip_prefix("0x")
                        .or_else(|| text.strip_prefix("0X"))
                    {
                        Some(hex) => <$ty>::from_str_radix(hex, 16),
                        None => text.parse::<$ty>(),
                    };
                    parsed.map_err(|_| MemoryError::invalid_value(ValueType::$variant, text))
                }
            }
        )*
    };
}

macro_rules! impl_float_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl_scalar_common!($ty, $variant);

            impl Scalar for $ty {
                impl_scalar_codec!($ty, $variant);

                fn compare(self, other: Self, comparison: Comparison) -> bool {
                    comparison.tolerant(self, other, FLOAT_TOLERANCE as $ty)
                }

                fn parse_text(input: &str) -> MemoryResult<Self> {
                    let text = input.trim();
                    text.parse::<$ty>()
                        .map_err(|_| MemoryError::invalid_value(ValueType::$variant, text))
                }
            }
        )*
    };
}

impl_int_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
}

impl_float_scalar! {
    f32 => F32,
    f64 => F64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_sizes() {
        assert_eq!(ValueType::I8.size(), 1);
        assert_eq!(ValueType::U16.size(), 2);
        assert_eq!(ValueType::F32.bit_size(), 32);
        assert_eq!(ValueType::U64.bit_size(), 64);
        assert_eq!(<i32 as Scalar>::SIZE, 4);
        assert_eq!(<f64 as Scalar>::VALUE_TYPE, ValueType::F64);
    }

    #[test]
    fn test_value_type_parsing() {
        assert_eq!("i32".parse::<ValueType>().unwrap(), ValueType::I32);
        assert_eq!("Float64".parse::<ValueType>().unwrap(), ValueType::F64);
        assert_eq!("UINT8".parse::<ValueType>().unwrap(), ValueType::U8);
        assert!("i128".parse::<ValueType>().is_err());
        assert_eq!(ValueType::U32.to_string(), "UInt32");
    }

    #[test]
    fn test_decode_uses_native_endianness() {
        let bytes = 0x1234_5678u32.to_ne_bytes();
        assert_eq!(u32::decode(&bytes), Some(0x1234_5678));
        assert_eq!(u32::decode(&bytes[..3]), None);
        assert_eq!(i8::decode(&[0xFF, 0x00]), Some(-1));
        assert_eq!(f32::decode(&1.5f32.to_ne_bytes()), Some(1.5));
    }

    #[test]
    fn test_integer_comparisons_are_exact() {
        assert!(5i32.compare(5, Comparison::Equals));
        assert!(!5i32.compare(6, Comparison::Equals));
        assert!(u8::MAX.compare(0, Comparison::GreaterThan));
        assert!((-3i64).compare(-2, Comparison::LessThan));
        assert!(!7u16.compare(7, Comparison::LessThan));
    }

    #[test]
    fn test_float_comparisons_use_tolerance() {
        assert!(1.0f32.compare(1.0005, Comparison::Equals));
        assert!(!1.0f32.compare(1.01, Comparison::Equals));
        assert!(1.0f32.compare(1.0005, Comparison::LessThan));
        assert!(1.0f64.compare(1.0005, Comparison::Equals));
        assert!(!1.0f64.compare(1.01, Comparison::Equals));
        assert!(1.0f64.compare(1.0005, Comparison::LessThan));
        assert!(1.0f64.compare(1.01, Comparison::NotEquals));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(i32::parse_text(" -42 ").unwrap(), -42);
        assert_eq!(u32::parse_text("0xFF").unwrap(), 255);
        assert!(u8::parse_text("256").is_err());
        assert!(i16::parse_text("abc").is_err());
        assert_eq!(f64::parse_text("2.5").unwrap(), 2.5);
    }

    #[test]
    fn test_memory_value_conversions() {
        let value = MemoryValue::parse("100", ValueType::U16).unwrap();
        assert_eq!(value, MemoryValue::U16(100));
        assert_eq!(value.size(), 2);
        assert_eq!(value.to_bytes(), 100u16.to_ne_bytes().to_vec());
        assert_eq!(
            MemoryValue::from_bytes(&value.to_bytes(), ValueType::U16),
            Some(value)
        );
        assert_eq!(u16::from_value(&value), Some(100));
        assert_eq!(i16::from_value(&value), None);
        assert_eq!(7i64.into_value(), MemoryValue::I64(7));
        assert_eq!(MemoryValue::F32(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_memory_value_serialization() {
        let json = serde_json::to_string(&MemoryValue::I32(-5)).unwrap();
        assert_eq!(json, r#"{"type":"I32","value":-5}"#);
    }
}
