//! Overload records: a signature, a return type, and a kernel.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::operator::{BinaryOperator, MultiOperator, UnaryOperator};
use crate::types::{DataType, Values};

use super::signature::{BinarySignature, MultiSignature, UnarySignature};

/// Vectorized kernel taking one operand batch.
pub type UnaryKernel = Arc<dyn Fn(&Values) -> Result<Values> + Send + Sync>;

/// Vectorized kernel taking a left and a right operand batch.
pub type BinaryKernel = Arc<dyn Fn(&Values, &Values) -> Result<Values> + Send + Sync>;

/// Vectorized kernel taking any number of operand batches.
pub type MultiKernel = Arc<dyn Fn(&[Values]) -> Result<Values> + Send + Sync>;

/// A registered unary overload.
#[derive(Clone)]
pub struct UnaryOverload {
    signature: UnarySignature,
    return_type: DataType,
    kernel: UnaryKernel,
}

impl UnaryOverload {
    /// Creates a record from its parts.
    #[must_use]
    pub fn new(signature: UnarySignature, return_type: DataType, kernel: UnaryKernel) -> Self {
        UnaryOverload {
            signature,
            return_type,
            kernel,
        }
    }

    #[must_use]
    pub fn signature(&self) -> UnarySignature {
        self.signature
    }

    #[must_use]
    pub fn return_type(&self) -> DataType {
        self.return_type
    }

    /// Returns the kernel shared by every clone of this record.
    #[must_use]
    pub fn kernel(&self) -> &UnaryKernel {
        &self.kernel
    }

    /// Runs the kernel.
    ///
    /// # Errors
    ///
    /// Returns whatever error the kernel raises, unchanged.
    pub fn call(&self, operand: &Values) -> Result<Values> {
        (self.kernel)(operand)
    }

    /// Renders the overload for plan and diagnostic output, e.g. `- INT64 -> INT64`.
    #[must_use]
    pub fn render(&self, op: UnaryOperator) -> String {
        format!("{} {} -> {}", op, self.signature.operand, self.return_type)
    }
}

impl fmt::Debug for UnaryOverload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryOverload")
            .field("signature", &self.signature)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

/// A registered binary overload.
#[derive(Clone)]
pub struct BinaryOverload {
    signature: BinarySignature,
    return_type: DataType,
    kernel: BinaryKernel,
}

impl BinaryOverload {
    /// Creates a record from its parts.
    #[must_use]
    pub fn new(signature: BinarySignature, return_type: DataType, kernel: BinaryKernel) -> Self {
        BinaryOverload {
            signature,
            return_type,
            kernel,
        }
    }

    #[must_use]
    pub fn signature(&self) -> BinarySignature {
        self.signature
    }

    #[must_use]
    pub fn return_type(&self) -> DataType {
        self.return_type
    }

    /// Returns the kernel shared by every clone of this record.
    #[must_use]
    pub fn kernel(&self) -> &BinaryKernel {
        &self.kernel
    }

    /// Runs the kernel.
    ///
    /// # Errors
    ///
    /// Returns whatever error the kernel raises, unchanged.
    pub fn call(&self, left: &Values, right: &Values) -> Result<Values> {
        (self.kernel)(left, right)
    }

    /// Renders the overload, e.g. `INT64 + INT64 -> INT64`.
    #[must_use]
    pub fn render(&self, op: BinaryOperator) -> String {
        format!(
            "{} {} {} -> {}",
            self.signature.left, op, self.signature.right, self.return_type
        )
    }
}

impl fmt::Debug for BinaryOverload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOverload")
            .field("signature", &self.signature)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

/// A registered multi overload.
#[derive(Clone)]
pub struct MultiOverload {
    signature: MultiSignature,
    return_type: DataType,
    kernel: MultiKernel,
}

impl MultiOverload {
    /// Creates a record from its parts.
    #[must_use]
    pub fn new(signature: MultiSignature, return_type: DataType, kernel: MultiKernel) -> Self {
        MultiOverload {
            signature,
            return_type,
            kernel,
        }
    }

    #[must_use]
    pub fn signature(&self) -> MultiSignature {
        self.signature
    }

    #[must_use]
    pub fn return_type(&self) -> DataType {
        self.return_type
    }

    /// Returns the kernel shared by every clone of this record.
    #[must_use]
    pub fn kernel(&self) -> &MultiKernel {
        &self.kernel
    }

    /// Runs the kernel.
    ///
    /// # Errors
    ///
    /// Returns whatever error the kernel raises, unchanged.
    pub fn call(&self, operands: &[Values]) -> Result<Values> {
        (self.kernel)(operands)
    }

    /// Renders the overload, e.g. `concat(STRING, ...) [at least 2] -> STRING`.
    #[must_use]
    pub fn render(&self, op: MultiOperator) -> String {
        format!(
            "{}({}, ...) [{}] -> {}",
            op, self.signature.operand, self.signature.arity, self.return_type
        )
    }
}

impl fmt::Debug for MultiOverload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiOverload")
            .field("signature", &self.signature)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}
