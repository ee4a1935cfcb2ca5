use std::{fmt, sync::Arc};

use arrow::{
    array::{ArrayRef, PrimitiveArray},
    buffer::ScalarBuffer,
    datatypes::{ArrowPrimitiveType, DataType},
};

use super::{BufferError, ColumnBuffer, Validity};

/// Fixed-width column backed by a plain value vector and a validity bitmap.
pub struct PrimitiveColumn<T: ArrowPrimitiveType> {
    values: Vec<T::Native>,
    validity: Validity,
    data_type: DataType,
}

impl<T: ArrowPrimitiveType> PrimitiveColumn<T> {
    /// Create a column with room for `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            validity: Validity::with_capacity(capacity),
            data_type: T::DATA_TYPE,
        }
    }

    /// Override the Arrow type, e.g. to carry decimal precision and scale.
    pub(crate) fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Value stored at `row`, `None` for null or unwritten rows.
    pub fn get(&self, row: usize) -> Option<T::Native> {
        self.validity.is_valid(row).then(|| self.values[row])
    }

    fn grow(&mut self, row: usize) {
        if row >= self.values.len() {
            self.values.resize(row + 1, T::Native::default());
        }
    }
}

impl<T: ArrowPrimitiveType> fmt::Debug for PrimitiveColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveColumn")
            .field("data_type", &self.data_type)
            .field("rows", &self.values.len())
            .finish()
    }
}

impl<T: ArrowPrimitiveType> Default for PrimitiveColumn<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: ArrowPrimitiveType> ColumnBuffer for PrimitiveColumn<T> {
    type Value = T::Native;

    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn set_value(&mut self, row: usize, value: &T::Native) -> Result<(), BufferError> {
        self.grow(row);
        self.values[row] = *value;
        self.validity.set(row, true);
        Ok(())
    }

    fn set_null(&mut self, row: usize) -> Result<(), BufferError> {
        // Null slots keep a zeroed value so the finished array never exposes stale data.
        self.grow(row);
        self.values[row] = T::Native::default();
        self.validity.set(row, false);
        Ok(())
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn is_null(&self, row: usize) -> bool {
        !self.validity.is_valid(row)
    }

    fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
        self.validity.truncate(len);
    }

    fn build(&self, len: usize) -> Result<ArrayRef, BufferError> {
        let kept = len.min(self.values.len());
        let mut values = Vec::with_capacity(len);
        values.extend_from_slice(&self.values[..kept]);
        values.resize(len, T::Native::default());
        let nulls = self.validity.build(len);
        let array = PrimitiveArray::<T>::try_new(ScalarBuffer::from(values), nulls)?
            .with_data_type(self.data_type.clone());
        Ok(Arc::new(array))
    }

    fn clear(&mut self) {
        self.values.clear();
        self.validity.clear();
    }
}
