//! Built-in kernel set.
//!
//! Every kernel here is registered through the public
//! [`RegistryBuilder`] methods and computed with Arrow compute kernels.
//! Arrow failures (overflow, division by zero, bad patterns, strict cast
//! failures) surface as [`VecopError::Kernel`].

mod arithmetic;
mod cast;
mod compare;
mod conditional;
mod string;

use arrow::array::{Array, AsArray, BooleanArray, PrimitiveArray, StringArray};
use arrow::datatypes::ArrowPrimitiveType;
use tracing::debug;

use crate::error::{Result, VecopError};
use crate::overload::RegistryBuilder;
use crate::types::Values;

/// Registers every built-in kernel into `builder`.
///
/// # Errors
///
/// Returns [`VecopError::DuplicateSignature`] if `builder` already holds an
/// overload that a built-in would also register.
pub fn register_builtins(builder: &RegistryBuilder) -> Result<()> {
    let before = builder.len();
    arithmetic::register(builder)?;
    compare::register(builder)?;
    string::register(builder)?;
    cast::register(builder)?;
    conditional::register(builder)?;
    debug!(count = builder.len() - before, "registered built-in kernels");
    Ok(())
}

/// Downcasts an operand to a primitive array.
fn primitive<T: ArrowPrimitiveType>(values: &Values) -> Result<&PrimitiveArray<T>> {
    values.array().as_primitive_opt::<T>().ok_or_else(|| {
        VecopError::KernelError(format!(
            "expected {} operand, got {}",
            T::DATA_TYPE,
            values.array().data_type()
        ))
    })
}

/// Downcasts an operand to a boolean array.
fn boolean(values: &Values) -> Result<&BooleanArray> {
    values.array().as_boolean_opt().ok_or_else(|| {
        VecopError::KernelError(format!(
            "expected Boolean operand, got {}",
            values.array().data_type()
        ))
    })
}

/// Downcasts an operand to a UTF-8 string array.
fn utf8(values: &Values) -> Result<&StringArray> {
    values.array().as_string_opt::<i32>().ok_or_else(|| {
        VecopError::KernelError(format!(
            "expected Utf8 operand, got {}",
            values.array().data_type()
        ))
    })
}
