//! Overload registry.
//!
//! Holds, per operator, the overload records keyed by operand-type
//! signature. Resolution is exact-match only: no implicit widening and no
//! commutation. Ambiguity is rejected when an overload is registered, so
//! resolution never needs a tie-break.

mod record;
mod registry;
mod signature;

pub use record::{
    BinaryKernel, BinaryOverload, MultiKernel, MultiOverload, UnaryKernel, UnaryOverload,
};
pub use registry::{OverloadRegistry, RegistryBuilder};
pub use signature::{Arity, BinarySignature, MultiSignature, UnarySignature};
