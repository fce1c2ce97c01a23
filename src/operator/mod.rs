//! Operator catalog.
//!
//! Operators are split into three closed arity classes: unary, binary and
//! multi (variadic). Within a class, identifiers are contiguous indices
//! starting at 0, and each index maps to a display name through a fixed
//! array. The index is the stable identity: it is what gets serialized,
//! so variants must only ever be appended.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw index that does not name an operator of the given class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{class} operator index {index} out of range (class has {count} operators)")]
pub struct OperatorIndexError {
    /// Arity class label.
    pub class: &'static str,
    /// Offending index.
    pub index: u8,
    /// Number of operators in the class.
    pub count: usize,
}

macro_rules! operator_class {
    (
        $(#[$meta:meta])*
        $name:ident, $class:literal, $names:ident, $id:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $display:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        const $names: [&str; $name::COUNT] = [ $( $display, )+ ];

        impl $name {
            /// Every operator of this class, in index order.
            pub const ALL: &[$name] = &[ $( $name::$variant, )+ ];

            /// Number of operators in this class.
            pub const COUNT: usize = Self::ALL.len();

            /// Returns the stable index of this operator.
            #[must_use]
            pub fn index(self) -> u8 {
                self as u8
            }

            /// Looks up an operator by its stable index.
            #[must_use]
            pub fn from_index(index: u8) -> Option<Self> {
                Self::ALL.get(usize::from(index)).copied()
            }

            /// Returns the canonical display name.
            #[must_use]
            pub fn name(self) -> &'static str {
                $names[self as usize]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl From<$name> for u8 {
            fn from(op: $name) -> u8 {
                op.index()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = OperatorIndexError;

            fn try_from(index: u8) -> Result<Self, Self::Error> {
                $name::from_index(index).ok_or(OperatorIndexError {
                    class: $class,
                    index,
                    count: $name::COUNT,
                })
            }
        }

        impl From<$name> for OperatorId {
            fn from(op: $name) -> OperatorId {
                OperatorId::$id(op)
            }
        }
    };
}

operator_class! {
    /// Unary operators.
    UnaryOperator, "unary", UNARY_NAMES, Unary {
        /// Arithmetic negation (`-x`).
        UnaryMinus => "-",
        /// Logical negation.
        Not => "not",
        /// Absolute value.
        Abs => "abs",
    }
}

operator_class! {
    /// Binary operators.
    ///
    /// Operand order is significant: no operator is assumed commutative.
    #[allow(clippy::upper_case_acronyms)]
    BinaryOperator, "binary", BINARY_NAMES, Binary {
        /// Logical OR.
        Or => "or",
        /// Logical AND.
        And => "and",
        /// Addition.
        Plus => "+",
        /// Less than.
        LT => "<",
        /// Less than or equal.
        LE => "<=",
        /// Greater than.
        GT => ">",
        /// Greater than or equal.
        GE => ">=",
        /// Equal.
        EQ => "=",
        /// Not equal.
        NE => "<>",
        /// Subtraction.
        Minus => "-",
        /// Multiplication.
        Mult => "*",
        /// Division.
        Div => "/",
        /// Integer division.
        IntegerDiv => "div",
        /// Remainder.
        Mod => "%",
        /// SQL `LIKE` pattern match.
        Like => "like",
        /// SQL `NOT LIKE` pattern match.
        NotLike => "not like",
        /// Regular expression match.
        Match => "match",
        /// Negated regular expression match.
        NotMatch => "not match",
        /// Explicit cast; the right operand carries the target type.
        Typecast => "cast",
    }
}

operator_class! {
    /// Multi (variadic) operators.
    MultiOperator, "multi", MULTI_NAMES, Multi {
        /// String concatenation.
        Concat => "concat",
        /// First non-null argument.
        Coalesce => "coalesce",
    }
}

/// Arity class of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArityClass {
    Unary,
    Binary,
    Multi,
}

/// Any operator identifier, tagged with its arity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperatorId {
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    Multi(MultiOperator),
}

impl OperatorId {
    /// Returns the canonical display name of the operator.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            OperatorId::Unary(op) => op.name(),
            OperatorId::Binary(op) => op.name(),
            OperatorId::Multi(op) => op.name(),
        }
    }

    /// Returns the arity class of the operator.
    #[must_use]
    pub fn arity_class(self) -> ArityClass {
        match self {
            OperatorId::Unary(_) => ArityClass::Unary,
            OperatorId::Binary(_) => ArityClass::Binary,
            OperatorId::Multi(_) => ArityClass::Multi,
        }
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the display name of any operator.
#[must_use]
pub fn name_of(id: impl Into<OperatorId>) -> &'static str {
    id.into().name()
}
