//! String kernels: SQL `LIKE`, regular expression match and `concat`.

use arrow::array::StringArray;
use arrow::compute::kernels::boolean::not;
use arrow::compute::kernels::comparison::{like, nlike};
use arrow::compute::kernels::concat_elements::concat_elements_utf8;
use arrow::compute::kernels::regexp::regexp_is_match;

use crate::error::{Result, VecopError};
use crate::operator::{BinaryOperator, MultiOperator};
use crate::overload::{Arity, RegistryBuilder};
use crate::types::{DataType, Values};

use super::utf8;

pub(super) fn register(builder: &RegistryBuilder) -> Result<()> {
    builder.register_binary(
        BinaryOperator::Like,
        DataType::String,
        DataType::String,
        DataType::Bool,
        |l, r| Ok(Values::from(like(l.array(), r.array())?)),
    )?;
    builder.register_binary(
        BinaryOperator::NotLike,
        DataType::String,
        DataType::String,
        DataType::Bool,
        |l, r| Ok(Values::from(nlike(l.array(), r.array())?)),
    )?;
    builder.register_binary(
        BinaryOperator::Match,
        DataType::String,
        DataType::String,
        DataType::Bool,
        |l, r| {
            let matched = regexp_is_match(utf8(l)?, utf8(r)?, None::<&StringArray>)?;
            Ok(Values::from(matched))
        },
    )?;
    builder.register_binary(
        BinaryOperator::NotMatch,
        DataType::String,
        DataType::String,
        DataType::Bool,
        |l, r| {
            let matched = regexp_is_match(utf8(l)?, utf8(r)?, None::<&StringArray>)?;
            Ok(Values::from(not(&matched)?))
        },
    )?;

    builder.register_multi(
        MultiOperator::Concat,
        DataType::String,
        Arity::at_least(2),
        DataType::String,
        concat,
    )?;

    Ok(())
}

/// Row-wise concatenation; a null in any argument yields null.
fn concat(operands: &[Values]) -> Result<Values> {
    let mut iter = operands.iter();
    let Some(first) = iter.next() else {
        return Err(VecopError::KernelError(
            "concat requires at least one argument".to_string(),
        ));
    };

    let mut acc = utf8(first)?.clone();
    for next in iter {
        acc = concat_elements_utf8(&acc, utf8(next)?)?;
    }
    Ok(Values::from(acc))
}

#[cfg(test)]
mod tests {
    use arrow::array::{Array, BooleanArray, StringArray};

    use super::*;
    use crate::overload::OverloadRegistry;

    fn registry() -> OverloadRegistry {
        let builder = RegistryBuilder::new();
        register(&builder).unwrap();
        builder.freeze()
    }

    fn strings(values: &[&str]) -> Values {
        Values::from(StringArray::from(values.to_vec()))
    }

    #[test]
    fn test_like_wildcards() {
        let registry = registry();
        let text = strings(&["alice", "bob", "alfred"]);
        let pattern = strings(&["al%", "al%", "a_fred"]);

        let result = registry
            .invoke_binary(BinaryOperator::Like, &text, &pattern)
            .unwrap();
        let result = result.array().as_any().downcast_ref::<BooleanArray>().unwrap();
        assert!(result.value(0));
        assert!(!result.value(1));
        assert!(result.value(2));
    }

    #[test]
    fn test_invalid_regex_is_kernel_error() {
        let registry = registry();
        let text = strings(&["abc"]);
        let pattern = strings(&["(unclosed"]);

        let err = registry
            .invoke_binary(BinaryOperator::Match, &text, &pattern)
            .unwrap_err();
        assert!(matches!(err, VecopError::Kernel(_)));
    }

    #[test]
    fn test_not_match() {
        let registry = registry();
        let text = strings(&["abc", "xyz"]);
        let pattern = strings(&["^a", "^a"]);

        let result = registry
            .invoke_binary(BinaryOperator::NotMatch, &text, &pattern)
            .unwrap();
        let result = result.array().as_any().downcast_ref::<BooleanArray>().unwrap();
        assert!(!result.value(0));
        assert!(result.value(1));
    }

    #[test]
    fn test_concat_many() {
        let registry = registry();
        let args = vec![strings(&["a", "x"]), strings(&["b", "y"]), strings(&["c", "z"])];

        let result = registry
            .invoke_multi(MultiOperator::Concat, &args)
            .unwrap();
        let result = result.array().as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(result.value(0), "abc");
        assert_eq!(result.value(1), "xyz");
        assert_eq!(result.len(), 2);
    }
}
