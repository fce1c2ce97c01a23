//! Logical types and columnar operand batches.

mod data_type;
mod values;

pub use data_type::DataType;
pub use values::Values;
