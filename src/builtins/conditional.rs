//! `coalesce`: first non-null argument per row.

use arrow::array::Array;
use arrow::compute::is_not_null;
use arrow::compute::kernels::zip::zip;

use crate::error::{Result, VecopError};
use crate::operator::MultiOperator;
use crate::overload::{Arity, RegistryBuilder};
use crate::types::{DataType, Values};

pub(super) fn register(builder: &RegistryBuilder) -> Result<()> {
    for dt in DataType::ALL {
        builder.register_multi(MultiOperator::Coalesce, dt, Arity::at_least(1), dt, coalesce)?;
    }
    Ok(())
}

fn coalesce(operands: &[Values]) -> Result<Values> {
    let mut iter = operands.iter();
    let Some(first) = iter.next() else {
        return Err(VecopError::KernelError(
            "coalesce requires at least one argument".to_string(),
        ));
    };

    let mut acc = first.array().clone();
    for next in iter {
        if acc.null_count() == 0 {
            break;
        }
        let present = is_not_null(&acc)?;
        acc = zip(&present, &acc, next.array())?;
    }
    Values::try_new(acc)
}
