use std::{fmt, marker::PhantomData, ops::Range, sync::Arc};

use arrow::{
    array::{ArrayRef, GenericByteArray},
    buffer::{Buffer, OffsetBuffer},
    datatypes::{ArrowNativeType, ByteArrayType, DataType, GenericBinaryType, GenericStringType},
};

use super::{BufferError, ColumnBuffer, Validity};

/// UTF-8 column with 32-bit offsets.
pub type StringColumn = ByteColumn<GenericStringType<i32>>;

/// Binary column with 32-bit offsets.
pub type BinaryColumn = ByteColumn<GenericBinaryType<i32>>;

/// Variable-length column that accepts already-encoded bytes.
///
/// Bytes are appended to a scratch area in write order and each row records
/// the span it owns; `build` compacts the live spans into row order.
/// Overwriting the row that owns the tail of the scratch area reuses that
/// space, so repeated writes at one cursor keep a single value's bytes. Spans
/// orphaned by any other overwrite are discarded at `clear`.
pub struct ByteColumn<T: ByteArrayType> {
    data: Vec<u8>,
    spans: Vec<Range<usize>>,
    validity: Validity,
    data_type: DataType,
    _type: PhantomData<T>,
}

impl<T: ByteArrayType> ByteColumn<T> {
    /// Create a column with room for `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::with_capacity(capacity),
            validity: Validity::with_capacity(capacity),
            data_type: T::DATA_TYPE,
            _type: PhantomData,
        }
    }

    /// Encoded bytes stored at `row`, `None` for null or unwritten rows.
    pub fn get(&self, row: usize) -> Option<&[u8]> {
        self.validity
            .is_valid(row)
            .then(|| &self.data[self.spans[row].clone()])
    }

    /// Bytes held in the scratch area, live or orphaned.
    pub fn scratch_len(&self) -> usize {
        self.data.len()
    }

    fn grow(&mut self, row: usize) {
        if row >= self.spans.len() {
            self.spans.resize(row + 1, 0..0);
        }
    }

    /// Give `row`'s bytes back when they sit at the tail of the scratch area.
    fn release(&mut self, row: usize) {
        let span = &self.spans[row];
        // Only non-empty spans are ever stored, so a tail match owns those bytes alone.
        if !span.is_empty() && span.end == self.data.len() {
            self.data.truncate(span.start);
        }
        self.spans[row] = 0..0;
    }
}

impl<T: ByteArrayType> fmt::Debug for ByteColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteColumn")
            .field("data_type", &self.data_type)
            .field("rows", &self.spans.len())
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl<T: ByteArrayType> Default for ByteColumn<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: ByteArrayType> ColumnBuffer for ByteColumn<T> {
    type Value = [u8];

    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn set_value(&mut self, row: usize, value: &[u8]) -> Result<(), BufferError> {
        self.grow(row);
        self.release(row);
        if !value.is_empty() {
            let start = self.data.len();
            self.data.extend_from_slice(value);
            self.spans[row] = start..self.data.len();
        }
        self.validity.set(row, true);
        Ok(())
    }

    fn set_null(&mut self, row: usize) -> Result<(), BufferError> {
        self.grow(row);
        self.release(row);
        self.validity.set(row, false);
        Ok(())
    }

    fn len(&self) -> usize {
        self.spans.len()
    }

    fn is_null(&self, row: usize) -> bool {
        !self.validity.is_valid(row)
    }

    fn truncate(&mut self, len: usize) {
        if len < self.spans.len() {
            for row in (len..self.spans.len()).rev() {
                self.release(row);
            }
            self.spans.truncate(len);
        }
        self.validity.truncate(len);
        if self.spans.is_empty() {
            self.data.clear();
        }
    }

    fn build(&self, len: usize) -> Result<ArrayRef, BufferError> {
        let kept = &self.spans[..len.min(self.spans.len())];
        let live = kept.iter().map(|span| span.len()).sum::<usize>();
        if T::Offset::from_usize(live).is_none() {
            return Err(BufferError::OffsetOverflow { len: live });
        }

        let mut values = Vec::with_capacity(live);
        let mut lengths = Vec::with_capacity(len);
        for span in kept {
            lengths.push(span.len());
            values.extend_from_slice(&self.data[span.clone()]);
        }
        lengths.resize(len, 0);

        let offsets = OffsetBuffer::<T::Offset>::from_lengths(lengths);
        let nulls = self.validity.build(len);
        let array = GenericByteArray::<T>::try_new(offsets, Buffer::from_vec(values), nulls)?;
        Ok(Arc::new(array))
    }

    fn clear(&mut self) {
        self.data.clear();
        self.spans.clear();
        self.validity.clear();
    }
}
