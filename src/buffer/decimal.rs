use arrow::{
    array::ArrayRef,
    datatypes::{DataType, Decimal128Type, DecimalType},
};

use super::{BufferError, ColumnBuffer, PrimitiveColumn};

/// `Decimal128(precision, scale)` column storing unscaled values at the column scale.
#[derive(Debug)]
pub struct DecimalColumn {
    inner: PrimitiveColumn<Decimal128Type>,
    precision: u8,
    scale: i8,
}

impl DecimalColumn {
    /// Create a column with room for `capacity` rows.
    pub fn with_capacity(precision: u8, scale: i8, capacity: usize) -> Self {
        Self {
            inner: PrimitiveColumn::with_capacity(capacity)
                .with_data_type(DataType::Decimal128(precision, scale)),
            precision,
            scale,
        }
    }

    /// Declared precision.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Declared scale; values must be rescaled to it before [`ColumnBuffer::set_value`].
    pub fn scale(&self) -> i8 {
        self.scale
    }

    /// Unscaled value stored at `row`, `None` for null or unwritten rows.
    pub fn get(&self, row: usize) -> Option<i128> {
        self.inner.get(row)
    }
}

impl ColumnBuffer for DecimalColumn {
    type Value = i128;

    fn data_type(&self) -> &DataType {
        self.inner.data_type()
    }

    fn set_value(&mut self, row: usize, value: &i128) -> Result<(), BufferError> {
        Decimal128Type::validate_decimal_precision(*value, self.precision).map_err(|_| {
            BufferError::DecimalOverflow {
                row,
                precision: self.precision,
            }
        })?;
        self.inner.set_value(row, value)
    }

    fn set_null(&mut self, row: usize) -> Result<(), BufferError> {
        self.inner.set_null(row)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn is_null(&self, row: usize) -> bool {
        self.inner.is_null(row)
    }

    fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }

    fn build(&self, len: usize) -> Result<ArrayRef, BufferError> {
        self.inner.build(len)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }
}
