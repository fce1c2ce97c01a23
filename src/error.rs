//! Error types for operator dispatch.

use arrow::error::ArrowError;
use thiserror::Error;

use crate::operator::OperatorId;
use crate::types::DataType;

/// Result type alias using [`VecopError`].
pub type Result<T> = std::result::Result<T, VecopError>;

/// Error types for overload registration, resolution and kernel invocation.
#[derive(Debug, Error)]
pub enum VecopError {
    // ==================== Registration Errors ====================
    /// An equivalent signature is already registered for the operator.
    #[error("Duplicate signature for operator `{operator}`: {signature}")]
    DuplicateSignature {
        operator: OperatorId,
        signature: String,
    },

    /// A multi-operator arity range with `min > max`.
    #[error("Invalid arity for operator `{operator}`: min {min} exceeds max {max}")]
    InvalidArity {
        operator: OperatorId,
        min: usize,
        max: usize,
    },

    // ==================== Resolution Errors ====================
    /// No registered signature matches the operand types.
    #[error("operator `{operator}` not defined for types {types}")]
    NoMatchingOverload { operator: OperatorId, types: String },

    /// Argument count outside every accepted range for the operand type.
    #[error("operator `{operator}` expects {expected} arguments, got {actual}")]
    ArityMismatch {
        operator: OperatorId,
        expected: String,
        actual: usize,
    },

    /// A kernel produced a batch whose type differs from its declared return type.
    #[error("operator `{operator}` declared return type {expected}, kernel produced {actual}")]
    ReturnTypeMismatch {
        operator: OperatorId,
        expected: DataType,
        actual: DataType,
    },

    /// Arrow type with no logical counterpart.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    // ==================== Kernel Errors ====================
    /// Arrow compute failure raised inside a kernel.
    #[error(transparent)]
    Kernel(#[from] ArrowError),

    /// Kernel failure not originating in Arrow.
    #[error("Kernel error: {0}")]
    KernelError(String),
}

impl VecopError {
    /// Returns true for errors raised by a kernel rather than by dispatch.
    #[must_use]
    pub fn is_kernel_error(&self) -> bool {
        matches!(self, VecopError::Kernel(_) | VecopError::KernelError(_))
    }
}
