//! Columnar operand batch wrapper around an Arrow array.

use std::sync::Arc;

use arrow::array::{
    new_empty_array, new_null_array, Array, ArrayRef, BooleanArray, Date32Array, Float32Array,
    Float64Array, Int64Array, StringArray, TimestampMicrosecondArray,
};

use crate::error::{Result, VecopError};

use super::DataType;

/// An immutable batch of values of a single logical type.
///
/// The underlying array always uses the canonical Arrow type for its
/// logical type (see [`DataType::to_arrow`]), so kernels can downcast
/// without checking for alternate physical encodings.
#[derive(Debug, Clone)]
pub struct Values {
    /// The underlying Arrow array.
    array: ArrayRef,
    /// Logical type tag used for dispatch.
    data_type: DataType,
}

impl Values {
    /// Wraps an Arrow array, normalizing it to the canonical physical type.
    ///
    /// Normalization can lose information: timestamps in seconds,
    /// milliseconds or nanoseconds become microseconds (sub-microsecond
    /// precision is truncated), timezones are dropped, and `Date64` keeps
    /// only the day.
    ///
    /// # Errors
    ///
    /// Returns [`VecopError::UnsupportedType`] if the Arrow type has no
    /// logical counterpart, or a kernel error if normalization fails.
    pub fn try_new(array: ArrayRef) -> Result<Self> {
        let data_type = DataType::from_arrow(array.data_type())
            .ok_or_else(|| VecopError::UnsupportedType(array.data_type().to_string()))?;

        let canonical = data_type.to_arrow();
        let array = if *array.data_type() == canonical {
            array
        } else {
            arrow::compute::cast(&array, &canonical)?
        };

        Ok(Values { array, data_type })
    }

    /// Creates an empty batch of the given type.
    ///
    /// Useful as a pure type carrier, e.g. the target operand of `cast`.
    #[must_use]
    pub fn empty(data_type: DataType) -> Self {
        Values {
            array: new_empty_array(&data_type.to_arrow()),
            data_type,
        }
    }

    /// Creates a batch of `len` nulls of the given type.
    #[must_use]
    pub fn nulls(data_type: DataType, len: usize) -> Self {
        Values {
            array: new_null_array(&data_type.to_arrow(), len),
            data_type,
        }
    }

    /// Returns the logical type of this batch.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the underlying Arrow array.
    #[must_use]
    pub fn array(&self) -> &ArrayRef {
        &self.array
    }

    /// Consumes the batch, returning the underlying Arrow array.
    #[must_use]
    pub fn into_array(self) -> ArrayRef {
        self.array
    }

    /// Returns the number of rows in this batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Returns true if the batch has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Returns the number of null rows.
    #[must_use]
    pub fn null_count(&self) -> usize {
        self.array.null_count()
    }

    /// Returns a zero-copy slice of this batch.
    #[must_use]
    pub fn slice(&self, offset: usize, length: usize) -> Self {
        Values {
            array: self.array.slice(offset, length),
            data_type: self.data_type,
        }
    }
}

macro_rules! impl_from_array {
    ($array:ty, $data_type:expr) => {
        impl From<$array> for Values {
            fn from(array: $array) -> Self {
                Values {
                    array: Arc::new(array),
                    data_type: $data_type,
                }
            }
        }
    };
}

impl_from_array!(Int64Array, DataType::Int64);
impl_from_array!(Float32Array, DataType::Float32);
impl_from_array!(Float64Array, DataType::Float64);
impl_from_array!(BooleanArray, DataType::Bool);
impl_from_array!(StringArray, DataType::String);
impl_from_array!(Date32Array, DataType::Date);
impl_from_array!(TimestampMicrosecondArray, DataType::Timestamp);
