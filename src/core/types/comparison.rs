//! Comparison kinds used by filter passes

use super::error::MemoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Absolute tolerance applied to every floating-point comparison.
///
/// Not scaled by magnitude.
pub const FLOAT_TOLERANCE: f64 = 0.001;

/// Comparison between a freshly read value (left) and the filter value (right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    #[default]
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Equals,
        Comparison::NotEquals,
        Comparison::LessThan,
        Comparison::GreaterThan,
        Comparison::LessOrEqual,
        Comparison::GreaterOrEqual,
    ];

    /// Operator spelling, e.g. `<=`
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equals => "==",
            Comparison::NotEquals => "!=",
            Comparison::LessThan => "<",
            Comparison::GreaterThan => ">",
            Comparison::LessOrEqual => "<=",
            Comparison::GreaterOrEqual => ">=",
        }
    }

    /// Exact comparison for totally ordered values
    pub fn exact<T: Ord>(&self, a: T, b: T) -> bool {
        match self {
            Comparison::Equals => a == b,
            Comparison::NotEquals => a != b,
            Comparison::LessThan => a < b,
            Comparison::GreaterThan => a > b,
            Comparison::LessOrEqual => a <= b,
            Comparison::GreaterOrEqual => a >= b,
        }
    }

    /// Tolerant comparison. The left operand is shifted towards the right one
    /// by `epsilon`, so a value within `epsilon` of the boundary satisfies a
    /// strict inequality.
    pub fn tolerant<F>(&self, a: F, b: F, epsilon: F) -> bool
    where
        F: Copy + PartialOrd + Add<Output = F> + Sub<Output = F>,
    {
        match self {
            Comparison::Equals => a - b <= epsilon && b - a <= epsilon,
            Comparison::NotEquals => a - b > epsilon || b - a > epsilon,
            Comparison::LessThan => (a - epsilon) < b,
            Comparison::GreaterThan => (a + epsilon) > b,
            Comparison::LessOrEqual => (a - epsilon) <= b,
            Comparison::GreaterOrEqual => (a + epsilon) >= b,
        }
    }
}

impl FromStr for Comparison {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "==" | "=" | "eq" => Ok(Comparison::Equals),
            "!=" | "ne" => Ok(Comparison::NotEquals),
            "<" | "lt" => Ok(Comparison::LessThan),
            ">" | "gt" => Ok(Comparison::GreaterThan),
            "<=" | "le" => Ok(Comparison::LessOrEqual),
            ">=" | "ge" => Ok(Comparison::GreaterOrEqual),
            other => Err(MemoryError::InvalidComparison(other.to_string())),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
