use std::sync::Arc;

use arrow::{
    array::{ArrayRef, BooleanArray, BooleanBufferBuilder},
    datatypes::DataType,
};

use super::{copy_bits, BufferError, ColumnBuffer, Validity};

/// Bit-packed boolean column.
#[derive(Debug)]
pub struct BooleanColumn {
    values: BooleanBufferBuilder,
    validity: Validity,
    data_type: DataType,
}

impl BooleanColumn {
    /// Create a column with room for `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: BooleanBufferBuilder::new(capacity),
            validity: Validity::with_capacity(capacity),
            data_type: DataType::Boolean,
        }
    }

    /// Value stored at `row`, `None` for null or unwritten rows.
    pub fn get(&self, row: usize) -> Option<bool> {
        self.validity
            .is_valid(row)
            .then(|| self.values.get_bit(row))
    }

    fn put(&mut self, row: usize, bit: bool) {
        let len = self.values.len();
        if row < len {
            self.values.set_bit(row, bit);
        } else {
            self.values.append_n(row - len, false);
            self.values.append(bit);
        }
    }
}

impl Default for BooleanColumn {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl ColumnBuffer for BooleanColumn {
    type Value = bool;

    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn set_value(&mut self, row: usize, value: &bool) -> Result<(), BufferError> {
        self.put(row, *value);
        self.validity.set(row, true);
        Ok(())
    }

    fn set_null(&mut self, row: usize) -> Result<(), BufferError> {
        self.put(row, false);
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
        if len < self.values.len() {
            self.values.truncate(len);
        }
        self.validity.truncate(len);
    }

    fn build(&self, len: usize) -> Result<ArrayRef, BufferError> {
        let values = copy_bits(&self.values, len);
        let nulls = self.validity.build(len);
        Ok(Arc::new(BooleanArray::new(values, nulls)))
    }

    fn clear(&mut self) {
        self.values.truncate(0);
        self.validity.clear();
    }
}
