//! Arithmetic kernels: negation, absolute value and the binary operators.

use arrow::array::{ArrayRef, Datum};
use arrow::compute::kernels::numeric::{add, div, mul, neg, rem, sub};
use arrow::datatypes::{Float32Type, Float64Type, Int64Type};
use arrow::error::ArrowError;

use crate::error::Result;
use crate::operator::{BinaryOperator, UnaryOperator};
use crate::overload::RegistryBuilder;
use crate::types::{DataType, Values};

use super::primitive;

type NumericKernel = fn(&dyn Datum, &dyn Datum) -> std::result::Result<ArrayRef, ArrowError>;

const NUMERIC: [DataType; 3] = [DataType::Int64, DataType::Float32, DataType::Float64];

const BINARY: [(BinaryOperator, NumericKernel); 5] = [
    (BinaryOperator::Plus, add),
    (BinaryOperator::Minus, sub),
    (BinaryOperator::Mult, mul),
    (BinaryOperator::Div, div),
    (BinaryOperator::Mod, rem),
];

pub(super) fn register(builder: &RegistryBuilder) -> Result<()> {
    for dt in NUMERIC {
        builder.register_unary(UnaryOperator::UnaryMinus, dt, dt, |v| {
            Values::try_new(neg(v.array())?)
        })?;

        for (op, kernel) in BINARY {
            builder.register_binary(op, dt, dt, dt, move |l, r| {
                Values::try_new(kernel(l.array(), r.array())?)
            })?;
        }
    }

    builder.register_unary(UnaryOperator::Abs, DataType::Int64, DataType::Int64, |v| {
        let abs = primitive::<Int64Type>(v)?.try_unary::<_, Int64Type, ArrowError>(|x| {
            x.checked_abs().ok_or_else(|| {
                ArrowError::ArithmeticOverflow(format!("Overflow happened on: abs({x})"))
            })
        })?;
        Ok(Values::from(abs))
    })?;
    builder.register_unary(UnaryOperator::Abs, DataType::Float32, DataType::Float32, |v| {
        Ok(Values::from(
            primitive::<Float32Type>(v)?.unary::<_, Float32Type>(f32::abs),
        ))
    })?;
    builder.register_unary(UnaryOperator::Abs, DataType::Float64, DataType::Float64, |v| {
        Ok(Values::from(
            primitive::<Float64Type>(v)?.unary::<_, Float64Type>(f64::abs),
        ))
    })?;

    // Truncating division, INT64 only.
    builder.register_binary(
        BinaryOperator::IntegerDiv,
        DataType::Int64,
        DataType::Int64,
        DataType::Int64,
        |l, r| Values::try_new(div(l.array(), r.array())?),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use arrow::array::{Float64Array, Int64Array};

    use super::*;
    use crate::error::VecopError;
    use crate::overload::OverloadRegistry;

    fn registry() -> OverloadRegistry {
        let builder = RegistryBuilder::new();
        register(&builder).unwrap();
        builder.freeze()
    }

    fn int64s(values: &Values) -> Vec<Option<i64>> {
        primitive::<Int64Type>(values).unwrap().iter().collect()
    }

    #[test]
    fn test_int64_add() {
        let registry = registry();
        let left = Values::from(Int64Array::from(vec![Some(1), Some(2), None]));
        let right = Values::from(Int64Array::from(vec![Some(10), Some(20), Some(30)]));

        let result = registry
            .invoke_binary(BinaryOperator::Plus, &left, &right)
            .unwrap();
        assert_eq!(int64s(&result), vec![Some(11), Some(22), None]);
    }

    #[test]
    fn test_int64_division_by_zero_is_kernel_error() {
        let registry = registry();
        let left = Values::from(Int64Array::from(vec![1]));
        let right = Values::from(Int64Array::from(vec![0]));

        let err = registry
            .invoke_binary(BinaryOperator::Div, &left, &right)
            .unwrap_err();
        assert!(matches!(err, VecopError::Kernel(ArrowError::DivideByZero)));
    }

    #[test]
    fn test_abs_overflow() {
        let registry = registry();
        let operand = Values::from(Int64Array::from(vec![i64::MIN]));
        let err = registry
            .invoke_unary(UnaryOperator::Abs, &operand)
            .unwrap_err();
        assert!(err.is_kernel_error());
    }

    #[test]
    fn test_float_negation_and_abs() {
        let registry = registry();
        let operand = Values::from(Float64Array::from(vec![-1.5, 2.0]));

        let negated = registry
            .invoke_unary(UnaryOperator::UnaryMinus, &operand)
            .unwrap();
        let values: Vec<_> = primitive::<Float64Type>(&negated).unwrap().values().to_vec();
        assert_eq!(values, vec![1.5, -2.0]);

        let abs = registry.invoke_unary(UnaryOperator::Abs, &operand).unwrap();
        let values: Vec<_> = primitive::<Float64Type>(&abs).unwrap().values().to_vec();
        assert_eq!(values, vec![1.5, 2.0]);
    }

    #[test]
    fn test_integer_div_truncates() {
        let registry = registry();
        let left = Values::from(Int64Array::from(vec![7, -7]));
        let right = Values::from(Int64Array::from(vec![2, 2]));
        let result = registry
            .invoke_binary(BinaryOperator::IntegerDiv, &left, &right)
            .unwrap();
        assert_eq!(int64s(&result), vec![Some(3), Some(-3)]);
    }
}
