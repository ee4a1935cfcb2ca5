//! Row-addressable Arrow column buffers.
//!
//! Unlike Arrow's append-only builders, these buffers accept writes at any row
//! index: writing past the end grows the buffer (rows in the gap read as
//! null) and writing below the end overwrites the previous cell. A field
//! writer owns no storage of its own and relies on this contract.

mod boolean;
mod bytes;
mod decimal;
mod primitive;

use arrow::{
    array::{ArrayRef, BooleanBufferBuilder},
    buffer::{BooleanBuffer, NullBuffer},
    datatypes::DataType,
    error::ArrowError,
};
pub use boolean::BooleanColumn;
pub use bytes::{BinaryColumn, ByteColumn, StringColumn};
pub use decimal::DecimalColumn;
pub use primitive::PrimitiveColumn;
use thiserror::Error;

/// Error raised by a column buffer.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The value needs more digits than the decimal column declares.
    #[error("decimal value at row {row} does not fit precision {precision}")]
    DecimalOverflow {
        /// Row being written.
        row: usize,
        /// Declared column precision.
        precision: u8,
    },
    /// Rescaling the value to the column scale overflowed.
    #[error("decimal value at row {row} cannot be rescaled to scale {scale}")]
    DecimalRescale {
        /// Row being written.
        row: usize,
        /// Declared column scale.
        scale: i8,
    },
    /// Variable-length data exceeds what the column's offset type can address.
    #[error("variable-length data of {len} bytes exceeds offset range")]
    OffsetOverflow {
        /// Total bytes that would be addressed.
        len: usize,
    },
    /// Arrow rejected the finished array.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

/// Typed, row-indexed storage for one column.
pub trait ColumnBuffer {
    /// Encoded value accepted by [`ColumnBuffer::set_value`].
    type Value: ?Sized;

    /// Arrow type of the finished array.
    fn data_type(&self) -> &DataType;

    /// Store `value` at `row`, growing the buffer when needed.
    fn set_value(&mut self, row: usize, value: &Self::Value) -> Result<(), BufferError>;

    /// Mark `row` as null, growing the buffer when needed.
    fn set_null(&mut self, row: usize) -> Result<(), BufferError>;

    /// Number of rows, including gap rows.
    fn len(&self) -> usize;

    /// Returns true when no row has been written.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true when `row` is beyond the end or holds a null marker.
    fn is_null(&self, row: usize) -> bool;

    /// Drop every row at or after `len`.
    fn truncate(&mut self, len: usize);

    /// Build an Arrow array of exactly `len` rows without touching the buffer.
    ///
    /// Rows past the end of the buffer are null; rows at or after `len` are left out.
    fn build(&self, len: usize) -> Result<ArrayRef, BufferError>;

    /// Drop every row.
    fn clear(&mut self);

    /// Build the Arrow array of every row and reset the buffer to empty.
    fn finish(&mut self) -> Result<ArrayRef, BufferError> {
        let array = self.build(self.len())?;
        self.clear();
        Ok(array)
    }
}

/// Validity bitmap that grows with null-filled gaps.
#[derive(Debug)]
pub(crate) struct Validity {
    bits: BooleanBufferBuilder,
}

impl Validity {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: BooleanBufferBuilder::new(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bits.len()
    }

    pub(crate) fn set(&mut self, row: usize, valid: bool) {
        let len = self.bits.len();
        if row < len {
            self.bits.set_bit(row, valid);
        } else {
            self.bits.append_n(row - len, false);
            self.bits.append(valid);
        }
    }

    pub(crate) fn is_valid(&self, row: usize) -> bool {
        row < self.bits.len() && self.bits.get_bit(row)
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        if len < self.bits.len() {
            self.bits.truncate(len);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.bits.truncate(0);
    }

    /// Null buffer for the first `len` rows; `None` when every one of them is valid.
    pub(crate) fn build(&self, len: usize) -> Option<NullBuffer> {
        let nulls = NullBuffer::new(copy_bits(&self.bits, len));
        (nulls.null_count() > 0).then_some(nulls)
    }
}

/// Copy the first `len` bits of `bits`, padding with unset bits past its end.
pub(crate) fn copy_bits(bits: &BooleanBufferBuilder, len: usize) -> BooleanBuffer {
    let kept = len.min(bits.len());
    let mut copy = BooleanBufferBuilder::new(len);
    copy.append_packed_range(0..kept, bits.as_slice());
    copy.append_n(len - kept, false);
    copy.finish()
}
