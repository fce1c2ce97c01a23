//! Operand-type signatures that select an overload.

use std::fmt;

use crate::types::DataType;

/// Signature of a unary overload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnarySignature {
    /// Operand type.
    pub operand: DataType,
}

impl UnarySignature {
    #[must_use]
    pub fn new(operand: DataType) -> Self {
        UnarySignature { operand }
    }
}

impl fmt::Display for UnarySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.operand)
    }
}

/// Signature of a binary overload. Order matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinarySignature {
    /// Left operand type.
    pub left: DataType,
    /// Right operand type.
    pub right: DataType,
}

impl BinarySignature {
    #[must_use]
    pub fn new(left: DataType, right: DataType) -> Self {
        BinarySignature { left, right }
    }
}

impl fmt::Display for BinarySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.left, self.right)
    }
}

/// Accepted argument-count range of a multi overload.
///
/// `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Arity {
    /// Minimum number of arguments (inclusive).
    pub min: usize,
    /// Maximum number of arguments (inclusive), or `None` if unbounded.
    pub max: Option<usize>,
}

impl Arity {
    /// Creates a range `[min, max]`.
    #[must_use]
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Arity { min, max }
    }

    /// Creates a range accepting exactly `count` arguments.
    #[must_use]
    pub fn exactly(count: usize) -> Self {
        Arity {
            min: count,
            max: Some(count),
        }
    }

    /// Creates an unbounded range starting at `min`.
    #[must_use]
    pub fn at_least(min: usize) -> Self {
        Arity { min, max: None }
    }

    /// Creates a bounded range `[min, max]`.
    #[must_use]
    pub fn between(min: usize, max: usize) -> Self {
        Arity {
            min,
            max: Some(max),
        }
    }

    /// Returns true if `min <= max` (always true when unbounded).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.max.map_or(true, |max| self.min <= max)
    }

    /// Returns true if `count` falls within the range.
    #[must_use]
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// Returns true if the two ranges share at least one count.
    #[must_use]
    pub fn overlaps(&self, other: &Arity) -> bool {
        let lo = self.min.max(other.min);
        match (self.max, other.max) {
            (None, None) => true,
            (Some(a), None) | (None, Some(a)) => lo <= a,
            (Some(a), Some(b)) => lo <= a.min(b),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            None => write!(f, "at least {}", self.min),
            Some(max) if max == self.min => write!(f, "exactly {max}"),
            Some(max) => write!(f, "{} to {}", self.min, max),
        }
    }
}

/// Signature of a multi overload: one operand type shared by every argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MultiSignature {
    /// Type of every argument.
    pub operand: DataType,
    /// Accepted argument count.
    pub arity: Arity,
}

impl MultiSignature {
    #[must_use]
    pub fn new(operand: DataType, arity: Arity) -> Self {
        MultiSignature { operand, arity }
    }

    /// Returns true if both signatures could match the same call.
    #[must_use]
    pub fn conflicts_with(&self, other: &MultiSignature) -> bool {
        self.operand == other.operand && self.arity.overlaps(&other.arity)
    }
}

impl fmt::Display for MultiSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, ...) with {} arguments", self.operand, self.arity)
    }
}
