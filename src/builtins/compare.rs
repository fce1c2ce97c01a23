//! Comparison and boolean kernels.

use arrow::array::{BooleanArray, Datum};
use arrow::compute::kernels::boolean::{and_kleene, not, or_kleene};
use arrow::compute::kernels::cmp::{eq, gt, gt_eq, lt, lt_eq, neq};
use arrow::error::ArrowError;

use crate::error::Result;
use crate::operator::{BinaryOperator, UnaryOperator};
use crate::overload::RegistryBuilder;
use crate::types::{DataType, Values};

use super::boolean;

type CompareKernel = fn(&dyn Datum, &dyn Datum) -> std::result::Result<BooleanArray, ArrowError>;

const COMPARISONS: [(BinaryOperator, CompareKernel); 6] = [
    (BinaryOperator::EQ, eq),
    (BinaryOperator::NE, neq),
    (BinaryOperator::LT, lt),
    (BinaryOperator::LE, lt_eq),
    (BinaryOperator::GT, gt),
    (BinaryOperator::GE, gt_eq),
];

pub(super) fn register(builder: &RegistryBuilder) -> Result<()> {
    for dt in DataType::ALL {
        for (op, kernel) in COMPARISONS {
            builder.register_binary(op, dt, dt, DataType::Bool, move |l, r| {
                Ok(Values::from(kernel(l.array(), r.array())?))
            })?;
        }
    }

    // Three-valued logic: NULL AND FALSE is FALSE, NULL OR TRUE is TRUE.
    builder.register_binary(
        BinaryOperator::And,
        DataType::Bool,
        DataType::Bool,
        DataType::Bool,
        |l, r| Ok(Values::from(and_kleene(boolean(l)?, boolean(r)?)?)),
    )?;
    builder.register_binary(
        BinaryOperator::Or,
        DataType::Bool,
        DataType::Bool,
        DataType::Bool,
        |l, r| Ok(Values::from(or_kleene(boolean(l)?, boolean(r)?)?)),
    )?;
    builder.register_unary(UnaryOperator::Not, DataType::Bool, DataType::Bool, |v| {
        Ok(Values::from(not(boolean(v)?)?))
    })?;

    Ok(())
}
