//! Overload registry: an open builder and the frozen lookup table it produces.
//!
//! Registration happens on a [`RegistryBuilder`]. Calling
//! [`RegistryBuilder::freeze`] consumes the builder and returns an immutable
//! [`OverloadRegistry`], which is the only type that can resolve or invoke.
//! There is no way back from frozen to open.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::builtins;
use crate::config::DispatchConfig;
use crate::error::{Result, VecopError};
use crate::operator::{BinaryOperator, MultiOperator, OperatorId, UnaryOperator};
use crate::types::{DataType, Values};

use super::record::{BinaryOverload, MultiOverload, UnaryOverload};
use super::signature::{Arity, BinarySignature, MultiSignature, UnarySignature};

/// Per-class overload tables, indexed by operator index.
struct Tables {
    unary: Vec<HashMap<UnarySignature, UnaryOverload>>,
    binary: Vec<HashMap<BinarySignature, BinaryOverload>>,
    multi: Vec<Vec<MultiOverload>>,
}

impl Tables {
    fn new() -> Self {
        Tables {
            unary: (0..UnaryOperator::COUNT).map(|_| HashMap::new()).collect(),
            binary: (0..BinaryOperator::COUNT).map(|_| HashMap::new()).collect(),
            multi: (0..MultiOperator::COUNT).map(|_| Vec::new()).collect(),
        }
    }

    fn counts(&self) -> (usize, usize, usize) {
        (
            self.unary.iter().map(HashMap::len).sum(),
            self.binary.iter().map(HashMap::len).sum(),
            self.multi.iter().map(Vec::len).sum(),
        )
    }
}

/// Registry in its open state: accepts registrations, cannot resolve.
///
/// Registration takes `&self`, so a builder may be shared between threads
/// during startup. Each insertion holds the lock only for that insertion.
pub struct RegistryBuilder {
    config: DispatchConfig,
    tables: Mutex<Tables>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Creates an empty builder.
    ///
    /// No built-in kernels are registered, regardless of the default config.
    #[must_use]
    pub fn new() -> Self {
        RegistryBuilder {
            config: DispatchConfig::default(),
            tables: Mutex::new(Tables::new()),
        }
    }

    /// Creates a builder from a configuration, registering built-ins if enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if built-in registration produces a conflict.
    pub fn with_config(config: DispatchConfig) -> Result<Self> {
        let include_builtins = config.include_builtins;
        let builder = RegistryBuilder {
            config,
            tables: Mutex::new(Tables::new()),
        };
        if include_builtins {
            builtins::register_builtins(&builder)?;
        }
        Ok(builder)
    }

    /// Returns the configuration this builder was created with.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Registers a unary overload.
    ///
    /// # Errors
    ///
    /// Returns [`VecopError::DuplicateSignature`] if `op` already has an
    /// overload for `operand`.
    pub fn register_unary<F>(
        &self,
        op: UnaryOperator,
        operand: DataType,
        return_type: DataType,
        kernel: F,
    ) -> Result<()>
    where
        F: Fn(&Values) -> Result<Values> + Send + Sync + 'static,
    {
        let signature = UnarySignature::new(operand);
        let mut tables = self.tables.lock();
        let slot = &mut tables.unary[usize::from(op.index())];
        if slot.contains_key(&signature) {
            return Err(VecopError::DuplicateSignature {
                operator: op.into(),
                signature: signature.to_string(),
            });
        }
        slot.insert(
            signature,
            UnaryOverload::new(signature, return_type, Arc::new(kernel)),
        );
        debug!(operator = %op, %signature, %return_type, "registered unary overload");
        Ok(())
    }

    /// Registers a binary overload for the ordered pair `(left, right)`.
    ///
    /// # Errors
    ///
    /// Returns [`VecopError::DuplicateSignature`] if `op` already has an
    /// overload for the same ordered pair.
    pub fn register_binary<F>(
        &self,
        op: BinaryOperator,
        left: DataType,
        right: DataType,
        return_type: DataType,
        kernel: F,
    ) -> Result<()>
    where
        F: Fn(&Values, &Values) -> Result<Values> + Send + Sync + 'static,
    {
        let signature = BinarySignature::new(left, right);
        let mut tables = self.tables.lock();
        let slot = &mut tables.binary[usize::from(op.index())];
        if slot.contains_key(&signature) {
            return Err(VecopError::DuplicateSignature {
                operator: op.into(),
                signature: signature.to_string(),
            });
        }
        slot.insert(
            signature,
            BinaryOverload::new(signature, return_type, Arc::new(kernel)),
        );
        debug!(operator = %op, %signature, %return_type, "registered binary overload");
        Ok(())
    }

    /// Registers a multi overload.
    ///
    /// # Errors
    ///
    /// Returns [`VecopError::InvalidArity`] if `arity.min > arity.max`, or
    /// [`VecopError::DuplicateSignature`] if an overload with the same operand
    /// type and an overlapping arity range exists.
    pub fn register_multi<F>(
        &self,
        op: MultiOperator,
        operand: DataType,
        arity: Arity,
        return_type: DataType,
        kernel: F,
    ) -> Result<()>
    where
        F: Fn(&[Values]) -> Result<Values> + Send + Sync + 'static,
    {
        if !arity.is_valid() {
            return Err(VecopError::InvalidArity {
                operator: op.into(),
                min: arity.min,
                max: arity.max.unwrap_or_default(),
            });
        }

        let signature = MultiSignature::new(operand, arity);
        let mut tables = self.tables.lock();
        let slot = &mut tables.multi[usize::from(op.index())];
        if let Some(existing) = slot
            .iter()
            .find(|o| o.signature().conflicts_with(&signature))
        {
            return Err(VecopError::DuplicateSignature {
                operator: op.into(),
                signature: format!("{signature} overlaps {}", existing.signature()),
            });
        }
        slot.push(MultiOverload::new(signature, return_type, Arc::new(kernel)));
        debug!(operator = %op, %signature, %return_type, "registered multi overload");
        Ok(())
    }

    /// Returns the number of registered overloads across all classes.
    #[must_use]
    pub fn len(&self) -> usize {
        let (unary, binary, multi) = self.tables.lock().counts();
        unary + binary + multi
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ends the registration phase.
    #[must_use]
    pub fn freeze(self) -> OverloadRegistry {
        let tables = self.tables.into_inner();
        let (unary, binary, multi) = tables.counts();
        info!(unary, binary, multi, "overload registry frozen");
        OverloadRegistry {
            tables,
            verify_return_type: self.config.verify_return_type,
        }
    }
}

/// Registry in its frozen state: immutable, resolves and invokes.
///
/// Safe to share across any number of threads without locking.
pub struct OverloadRegistry {
    tables: Tables,
    verify_return_type: bool,
}

impl OverloadRegistry {
    /// Returns an empty open builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builds and freezes a registry holding the built-in kernel set.
    ///
    /// # Errors
    ///
    /// Returns an error if built-in registration produces a conflict.
    pub fn builtin() -> Result<Self> {
        Ok(RegistryBuilder::with_config(DispatchConfig::default())?.freeze())
    }

    // ==================== Resolve ====================

    /// Finds the unary overload for exactly `operand`.
    ///
    /// # Errors
    ///
    /// Returns [`VecopError::NoMatchingOverload`] if none is registered.
    pub fn resolve_unary(&self, op: UnaryOperator, operand: DataType) -> Result<&UnaryOverload> {
        self.tables.unary[usize::from(op.index())]
            .get(&UnarySignature::new(operand))
            .ok_or_else(|| {
                trace!(operator = %op, %operand, "no unary overload");
                VecopError::NoMatchingOverload {
                    operator: op.into(),
                    types: operand.to_string(),
                }
            })
    }

    /// Finds the binary overload for exactly the ordered pair `(left, right)`.
    ///
    /// # Errors
    ///
    /// Returns [`VecopError::NoMatchingOverload`] if none is registered.
    pub fn resolve_binary(
        &self,
        op: BinaryOperator,
        left: DataType,
        right: DataType,
    ) -> Result<&BinaryOverload> {
        self.tables.binary[usize::from(op.index())]
            .get(&BinarySignature::new(left, right))
            .ok_or_else(|| {
                trace!(operator = %op, %left, %right, "no binary overload");
                VecopError::NoMatchingOverload {
                    operator: op.into(),
                    types: format!("{left}, {right}"),
                }
            })
    }

    /// Finds the multi overload for `count` arguments of type `operand`.
    ///
    /// # Errors
    ///
    /// Returns [`VecopError::NoMatchingOverload`] if no overload accepts
    /// `operand`, or [`VecopError::ArityMismatch`] if some do but none
    /// accepts `count` arguments.
    pub fn resolve_multi(
        &self,
        op: MultiOperator,
        operand: DataType,
        count: usize,
    ) -> Result<&MultiOverload> {
        let mut expected = Vec::new();
        for overload in &self.tables.multi[usize::from(op.index())] {
            let signature = overload.signature();
            if signature.operand != operand {
                continue;
            }
            if signature.arity.contains(count) {
                return Ok(overload);
            }
            expected.push(signature.arity);
        }

        if expected.is_empty() {
            trace!(operator = %op, %operand, "no multi overload");
            return Err(VecopError::NoMatchingOverload {
                operator: op.into(),
                types: operand.to_string(),
            });
        }

        trace!(operator = %op, %operand, count, "multi arity mismatch");
        Err(arity_mismatch(op, expected, count))
    }

    // ==================== Invoke ====================

    /// Resolves by the operand's runtime type and runs the kernel.
    ///
    /// # Errors
    ///
    /// Returns a resolution error, the kernel's own error unchanged, or
    /// [`VecopError::ReturnTypeMismatch`] when verification is enabled.
    pub fn invoke_unary(&self, op: UnaryOperator, operand: &Values) -> Result<Values> {
        let overload = self.resolve_unary(op, operand.data_type())?;
        let result = overload.call(operand)?;
        self.check_return_type(op.into(), overload.return_type(), &result)?;
        Ok(result)
    }

    /// Resolves by the operands' runtime types and runs the kernel.
    ///
    /// # Errors
    ///
    /// Returns a resolution error, the kernel's own error unchanged, or
    /// [`VecopError::ReturnTypeMismatch`] when verification is enabled.
    pub fn invoke_binary(
        &self,
        op: BinaryOperator,
        left: &Values,
        right: &Values,
    ) -> Result<Values> {
        let overload = self.resolve_binary(op, left.data_type(), right.data_type())?;
        let result = overload.call(left, right)?;
        self.check_return_type(op.into(), overload.return_type(), &result)?;
        Ok(result)
    }

    /// Resolves by the shared runtime type and count of `operands`, then runs the kernel.
    ///
    /// Every operand must have the same type. A call with no operands runs
    /// the single overload of `op` accepting zero arguments, if there is one.
    ///
    /// # Errors
    ///
    /// Returns a resolution error, the kernel's own error unchanged, or
    /// [`VecopError::ReturnTypeMismatch`] when verification is enabled.
    /// With no operands, returns [`VecopError::ArityMismatch`] if no overload
    /// accepts zero arguments, or [`VecopError::NoMatchingOverload`] if there
    /// are no overloads or several operand types accept zero arguments.
    pub fn invoke_multi(&self, op: MultiOperator, operands: &[Values]) -> Result<Values> {
        let Some(first) = operands.first() else {
            let overload = self.resolve_multi_nullary(op)?;
            let result = overload.call(operands)?;
            self.check_return_type(op.into(), overload.return_type(), &result)?;
            return Ok(result);
        };

        let operand = first.data_type();
        if operands.iter().any(|v| v.data_type() != operand) {
            return Err(VecopError::NoMatchingOverload {
                operator: op.into(),
                types: operands
                    .iter()
                    .map(|v| v.data_type().name())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let overload = self.resolve_multi(op, operand, operands.len())?;
        let result = overload.call(operands)?;
        self.check_return_type(op.into(), overload.return_type(), &result)?;
        Ok(result)
    }

    /// Invokes a unary operator over independent batches on the rayon pool.
    ///
    /// Output order matches input order. The first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns any error [`OverloadRegistry::invoke_unary`] would.
    pub fn par_invoke_unary(&self, op: UnaryOperator, batches: &[Values]) -> Result<Vec<Values>> {
        batches
            .par_iter()
            .map(|operand| self.invoke_unary(op, operand))
            .collect()
    }

    /// Invokes a binary operator over independent `(left, right)` batches on the rayon pool.
    ///
    /// Output order matches input order. The first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns any error [`OverloadRegistry::invoke_binary`] would.
    pub fn par_invoke_binary(
        &self,
        op: BinaryOperator,
        batches: &[(Values, Values)],
    ) -> Result<Vec<Values>> {
        batches
            .par_iter()
            .map(|(left, right)| self.invoke_binary(op, left, right))
            .collect()
    }

    /// Zero arguments carry no type, so the candidate is picked by arity alone.
    fn resolve_multi_nullary(&self, op: MultiOperator) -> Result<&MultiOverload> {
        let overloads = &self.tables.multi[usize::from(op.index())];
        let mut accepting = overloads.iter().filter(|o| o.signature().arity.contains(0));

        match (accepting.next(), accepting.next()) {
            (Some(overload), None) => Ok(overload),
            (None, _) if !overloads.is_empty() => {
                trace!(operator = %op, "multi arity mismatch with no operands");
                Err(arity_mismatch(
                    op,
                    overloads.iter().map(|o| o.signature().arity).collect(),
                    0,
                ))
            }
            _ => Err(VecopError::NoMatchingOverload {
                operator: op.into(),
                types: "()".to_string(),
            }),
        }
    }

    fn check_return_type(
        &self,
        operator: OperatorId,
        expected: DataType,
        result: &Values,
    ) -> Result<()> {
        if self.verify_return_type && result.data_type() != expected {
            return Err(VecopError::ReturnTypeMismatch {
                operator,
                expected,
                actual: result.data_type(),
            });
        }
        Ok(())
    }

    // ==================== Introspection ====================

    /// Returns the unary overloads of `op`, ordered by signature.
    #[must_use]
    pub fn overloads_unary(&self, op: UnaryOperator) -> Vec<&UnaryOverload> {
        let mut overloads: Vec<_> = self.tables.unary[usize::from(op.index())]
            .values()
            .collect();
        overloads.sort_by_key(|o| o.signature());
        overloads
    }

    /// Returns the binary overloads of `op`, ordered by signature.
    #[must_use]
    pub fn overloads_binary(&self, op: BinaryOperator) -> Vec<&BinaryOverload> {
        let mut overloads: Vec<_> = self.tables.binary[usize::from(op.index())]
            .values()
            .collect();
        overloads.sort_by_key(|o| o.signature());
        overloads
    }

    /// Returns the multi overloads of `op`, ordered by signature.
    #[must_use]
    pub fn overloads_multi(&self, op: MultiOperator) -> Vec<&MultiOverload> {
        let mut overloads: Vec<_> = self.tables.multi[usize::from(op.index())].iter().collect();
        overloads.sort_by_key(|o| o.signature());
        overloads
    }

    /// Renders one line per overload of `op`, for EXPLAIN output and
    /// "candidates are" diagnostics.
    #[must_use]
    pub fn describe(&self, op: OperatorId) -> Vec<String> {
        match op {
            OperatorId::Unary(op) => self
                .overloads_unary(op)
                .into_iter()
                .map(|o| o.render(op))
                .collect(),
            OperatorId::Binary(op) => self
                .overloads_binary(op)
                .into_iter()
                .map(|o| o.render(op))
                .collect(),
            OperatorId::Multi(op) => self
                .overloads_multi(op)
                .into_iter()
                .map(|o| o.render(op))
                .collect(),
        }
    }

    /// Returns the number of registered overloads across all classes.
    #[must_use]
    pub fn len(&self) -> usize {
        let (unary, binary, multi) = self.tables.counts();
        unary + binary + multi
    }

    /// Returns true if the registry holds no overloads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lists every accepted range once, in order, joined with "or".
fn arity_mismatch(op: MultiOperator, mut expected: Vec<Arity>, actual: usize) -> VecopError {
    expected.sort();
    expected.dedup();
    VecopError::ArityMismatch {
        operator: op.into(),
        expected: expected
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or "),
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};

    fn identity(values: &Values) -> Result<Values> {
        Ok(values.clone())
    }

    #[test]
    fn test_register_then_resolve_unary() {
        let builder = RegistryBuilder::new();
        builder
            .register_unary(UnaryOperator::Abs, DataType::Int64, DataType::Int64, identity)
            .unwrap();
        assert_eq!(builder.len(), 1);

        let registry = builder.freeze();
        let overload = registry
            .resolve_unary(UnaryOperator::Abs, DataType::Int64)
            .unwrap();
        assert_eq!(overload.return_type(), DataType::Int64);
    }

    #[test]
    fn test_duplicate_multi_range_rejected() {
        let builder = RegistryBuilder::new();
        let kernel = |args: &[Values]| -> Result<Values> { Ok(args[0].clone()) };
        builder
            .register_multi(
                MultiOperator::Concat,
                DataType::String,
                Arity::between(2, 4),
                DataType::String,
                kernel,
            )
            .unwrap();
        builder
            .register_multi(
                MultiOperator::Concat,
                DataType::String,
                Arity::at_least(5),
                DataType::String,
                kernel,
            )
            .unwrap();

        let err = builder
            .register_multi(
                MultiOperator::Concat,
                DataType::String,
                Arity::exactly(4),
                DataType::String,
                kernel,
            )
            .unwrap_err();
        assert!(matches!(err, VecopError::DuplicateSignature { .. }));
    }

    #[test]
    fn test_invalid_arity_rejected() {
        let builder = RegistryBuilder::new();
        let err = builder
            .register_multi(
                MultiOperator::Coalesce,
                DataType::Int64,
                Arity::between(3, 1),
                DataType::Int64,
                |args: &[Values]| Ok(args[0].clone()),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            VecopError::InvalidArity { min: 3, max: 1, .. }
        ));
    }

    #[test]
    fn test_arity_mismatch_lists_all_ranges() {
        let builder = RegistryBuilder::new();
        let kernel = |args: &[Values]| -> Result<Values> { Ok(args[0].clone()) };
        builder
            .register_multi(
                MultiOperator::Concat,
                DataType::String,
                Arity::at_least(6),
                DataType::String,
                kernel,
            )
            .unwrap();
        builder
            .register_multi(
                MultiOperator::Concat,
                DataType::String,
                Arity::between(2, 3),
                DataType::String,
                kernel,
            )
            .unwrap();
        let registry = builder.freeze();

        let err = registry
            .resolve_multi(MultiOperator::Concat, DataType::String, 4)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "operator `concat` expects 2 to 3 or at least 6 arguments, got 4"
        );
    }

    #[test]
    fn test_invoke_multi_heterogeneous_types() {
        let builder = RegistryBuilder::new();
        builder
            .register_multi(
                MultiOperator::Coalesce,
                DataType::Int64,
                Arity::at_least(1),
                DataType::Int64,
                |args: &[Values]| Ok(args[0].clone()),
            )
            .unwrap();
        let registry = builder.freeze();

        let ints = Values::from(Int64Array::from(vec![1]));
        let strings = Values::from(StringArray::from(vec!["a"]));
        let err = registry
            .invoke_multi(MultiOperator::Coalesce, &[ints, strings])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "operator `coalesce` not defined for types INT64, STRING"
        );
    }

    #[test]
    fn test_invoke_multi_without_operands_or_overloads() {
        let registry = RegistryBuilder::new().freeze();
        let err = registry
            .invoke_multi(MultiOperator::Concat, &[])
            .unwrap_err();
        assert!(matches!(err, VecopError::NoMatchingOverload { .. }));
    }

    #[test]
    fn test_return_type_verification() {
        let builder = RegistryBuilder::new();
        builder
            .register_unary(UnaryOperator::Not, DataType::Int64, DataType::Bool, identity)
            .unwrap();
        let registry = builder.freeze();

        let operand = Values::from(Int64Array::from(vec![1, 2]));
        let err = registry
            .invoke_unary(UnaryOperator::Not, &operand)
            .unwrap_err();
        assert!(matches!(
            err,
            VecopError::ReturnTypeMismatch {
                expected: DataType::Bool,
                actual: DataType::Int64,
                ..
            }
        ));
    }

    #[test]
    fn test_return_type_verification_disabled() {
        let config = DispatchConfig::new()
            .with_builtins(false)
            .with_verify_return_type(false);
        let builder = RegistryBuilder::with_config(config).unwrap();
        assert!(builder.is_empty());
        builder
            .register_unary(UnaryOperator::Not, DataType::Int64, DataType::Bool, identity)
            .unwrap();
        let registry = builder.freeze();

        let operand = Values::from(Int64Array::from(vec![1, 2]));
        let result = registry.invoke_unary(UnaryOperator::Not, &operand).unwrap();
        assert_eq!(result.data_type(), DataType::Int64);
    }

    #[test]
    fn test_describe_is_sorted() {
        let builder = RegistryBuilder::new();
        let kernel = |l: &Values, _: &Values| -> Result<Values> { Ok(l.clone()) };
        builder
            .register_binary(
                BinaryOperator::Plus,
                DataType::Float64,
                DataType::Float64,
                DataType::Float64,
                kernel,
            )
            .unwrap();
        builder
            .register_binary(
                BinaryOperator::Plus,
                DataType::Int64,
                DataType::Int64,
                DataType::Int64,
                kernel,
            )
            .unwrap();
        let registry = builder.freeze();

        assert_eq!(
            registry.describe(BinaryOperator::Plus.into()),
            vec![
                "INT64 + INT64 -> INT64".to_string(),
                "FLOAT64 + FLOAT64 -> FLOAT64".to_string(),
            ]
        );
        assert!(registry.describe(BinaryOperator::Minus.into()).is_empty());
    }
}
