//! Explicit casts (`cast`).
//!
//! The right operand only carries the target type; its rows are ignored.
//! Casts are strict: a value that cannot be represented in the target type
//! is an error rather than a silent null.

use arrow::compute::{cast_with_options, CastOptions};

use crate::error::Result;
use crate::operator::BinaryOperator;
use crate::overload::RegistryBuilder;
use crate::types::{DataType, Values};

/// Returns true if a `from -> to` cast is registered.
fn castable(from: DataType, to: DataType) -> bool {
    from == to
        || (from.is_numeric() && to.is_numeric())
        || from == DataType::String
        || to == DataType::String
        || (from.is_temporal() && to.is_temporal())
        || matches!(
            (from, to),
            (DataType::Int64, DataType::Bool) | (DataType::Bool, DataType::Int64)
        )
}

pub(super) fn register(builder: &RegistryBuilder) -> Result<()> {
    for from in DataType::ALL {
        for to in DataType::ALL {
            if !castable(from, to) {
                continue;
            }
            builder.register_binary(BinaryOperator::Typecast, from, to, to, move |l, _| {
                let options = CastOptions {
                    safe: false,
                    ..Default::default()
                };
                Values::try_new(cast_with_options(l.array(), &to.to_arrow(), &options)?)
            })?;
        }
    }
    Ok(())
}
