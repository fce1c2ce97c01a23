//! vecop - operator-overload dispatch for a vectorized SQL expression evaluator.
//!
//! Given an operator identity and the runtime types of its operands, the
//! registry selects the vectorized kernel registered for exactly those types
//! and invokes it against columnar batches (Arrow arrays).
//!
//! ```no_run
//! use arrow::array::Int64Array;
//! use vecop::{BinaryOperator, OverloadRegistry, Values};
//!
//! let registry = OverloadRegistry::builtin()?;
//! let left = Values::from(Int64Array::from(vec![1, 2, 3]));
//! let right = Values::from(Int64Array::from(vec![10, 20, 30]));
//! let sum = registry.invoke_binary(BinaryOperator::Plus, &left, &right)?;
//! assert_eq!(sum.len(), 3);
//! # Ok::<(), vecop::VecopError>(())
//! ```

pub mod builtins;
pub mod config;
pub mod error;
pub mod operator;
pub mod overload;
pub mod types;

pub use config::DispatchConfig;
pub use error::{Result, VecopError};
pub use operator::{name_of, BinaryOperator, MultiOperator, OperatorId, UnaryOperator};
pub use overload::{Arity, OverloadRegistry, RegistryBuilder};
pub use types::{DataType, Values};
