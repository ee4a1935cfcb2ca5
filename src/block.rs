//! Schema-driven set of column buffers finished into a `RecordBatch`.

use arrow::{
    array::ArrayRef,
    datatypes::{
        DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int16Type, Int32Type,
        Int64Type, Int8Type, SchemaRef,
    },
    record_batch::{RecordBatch, RecordBatchOptions},
};

use crate::{
    buffer::{
        BinaryColumn, BooleanColumn, BufferError, ColumnBuffer, DecimalColumn, PrimitiveColumn,
        StringColumn,
    },
    kind::{self, FieldKind},
    logging::fw_log,
    option::BlockOptions,
    WriteError,
};

macro_rules! define_column_vector {
    ($($variant:ident => $buffer:ty),* $(,)?) => {
        /// Column buffer for one block field, tagged by field kind.
        #[derive(Debug)]
        pub enum ColumnVector {
            $(
                #[doc = concat!("Buffer for [`kind::", stringify!($variant), "`] values.")]
                $variant($buffer),
            )*
        }

        impl ColumnVector {
            /// Name of the field kind this vector stores.
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $(ColumnVector::$variant(_) => <kind::$variant as FieldKind>::NAME,)*
                }
            }

            /// Arrow type of the finished array.
            pub fn data_type(&self) -> &DataType {
                match self {
                    $(ColumnVector::$variant(buffer) => buffer.data_type(),)*
                }
            }

            /// Number of rows, including gap rows.
            pub fn len(&self) -> usize {
                match self {
                    $(ColumnVector::$variant(buffer) => buffer.len(),)*
                }
            }

            /// Returns true when no row has been written.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Returns true when `row` is null or unwritten.
            pub fn is_null(&self, row: usize) -> bool {
                match self {
                    $(ColumnVector::$variant(buffer) => buffer.is_null(row),)*
                }
            }

            /// Mark `row` as null.
            pub fn set_null(&mut self, row: usize) -> Result<(), BufferError> {
                match self {
                    $(ColumnVector::$variant(buffer) => buffer.set_null(row),)*
                }
            }

            /// Drop every row at or after `len`.
            pub fn truncate(&mut self, len: usize) {
                match self {
                    $(ColumnVector::$variant(buffer) => buffer.truncate(len),)*
                }
            }

            /// Build an Arrow array of exactly `len` rows, leaving the buffer intact.
            pub fn build(&self, len: usize) -> Result<ArrayRef, BufferError> {
                match self {
                    $(ColumnVector::$variant(buffer) => buffer.build(len),)*
                }
            }

            /// Drop every row.
            pub fn clear(&mut self) {
                match self {
                    $(ColumnVector::$variant(buffer) => buffer.clear(),)*
                }
            }
        }
    };
}

define_column_vector!(
    Boolean => BooleanColumn,
    Int8 => PrimitiveColumn<Int8Type>,
    Int16 => PrimitiveColumn<Int16Type>,
    Int32 => PrimitiveColumn<Int32Type>,
    Int64 => PrimitiveColumn<Int64Type>,
    Float32 => PrimitiveColumn<Float32Type>,
    Float64 => PrimitiveColumn<Float64Type>,
    Date32 => PrimitiveColumn<Date32Type>,
    Date64 => PrimitiveColumn<Date64Type>,
    Decimal128 => DecimalColumn,
    Utf8 => StringColumn,
    Binary => BinaryColumn,
);

impl ColumnVector {
    /// Build the buffer for `data_type`, `None` when no field kind covers it.
    pub fn try_new(data_type: &DataType, capacity: usize) -> Option<Self> {
        let vector = match data_type {
            DataType::Boolean => ColumnVector::Boolean(BooleanColumn::with_capacity(capacity)),
            DataType::Int8 => ColumnVector::Int8(PrimitiveColumn::with_capacity(capacity)),
            DataType::Int16 => ColumnVector::Int16(PrimitiveColumn::with_capacity(capacity)),
            DataType::Int32 => ColumnVector::Int32(PrimitiveColumn::with_capacity(capacity)),
            DataType::Int64 => ColumnVector::Int64(PrimitiveColumn::with_capacity(capacity)),
            DataType::Float32 => ColumnVector::Float32(PrimitiveColumn::with_capacity(capacity)),
            DataType::Float64 => ColumnVector::Float64(PrimitiveColumn::with_capacity(capacity)),
            DataType::Date32 => ColumnVector::Date32(PrimitiveColumn::with_capacity(capacity)),
            DataType::Date64 => ColumnVector::Date64(PrimitiveColumn::with_capacity(capacity)),
            DataType::Decimal128(precision, scale) => ColumnVector::Decimal128(
                DecimalColumn::with_capacity(*precision, *scale, capacity),
            ),
            DataType::Utf8 => ColumnVector::Utf8(StringColumn::with_capacity(capacity)),
            DataType::Binary => ColumnVector::Binary(BinaryColumn::with_capacity(capacity)),
            _ => return None,
        };
        Some(vector)
    }
}

/// One column buffer per schema field.
///
/// Row writers borrow the buffers while rows are written; once they are
/// dropped the block is finished into a batch of the committed row count.
#[derive(Debug)]
pub struct Block {
    schema: SchemaRef,
    columns: Vec<ColumnVector>,
}

impl Block {
    /// Create a block with default options.
    pub fn new(schema: SchemaRef) -> Result<Self, WriteError> {
        Self::with_options(schema, &BlockOptions::default())
    }

    /// Create a block, failing on the first field without a field kind.
    pub fn with_options(schema: SchemaRef, options: &BlockOptions) -> Result<Self, WriteError> {
        let columns = schema
            .fields()
            .iter()
            .map(|field| {
                ColumnVector::try_new(field.data_type(), options.initial_capacity).ok_or_else(
                    || WriteError::UnsupportedType {
                        column: field.name().clone(),
                        data_type: field.data_type().clone(),
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { schema, columns })
    }

    /// Schema the block was built from.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Buffer for the field called `name`.
    pub fn column(&self, name: &str) -> Option<&ColumnVector> {
        let index = self.schema.index_of(name).ok()?;
        self.columns.get(index)
    }

    pub(crate) fn columns_mut(&mut self) -> std::slice::IterMut<'_, ColumnVector> {
        self.columns.iter_mut()
    }

    /// Finish every column into a batch of exactly `rows` rows.
    ///
    /// Rows written past `rows` are left out; columns shorter than `rows` are
    /// padded with nulls. Non-nullable fields holding nulls fail here. The
    /// buffers are cleared only once the batch is built, so a failed finish
    /// keeps every written row.
    pub fn finish(&mut self, rows: usize) -> Result<RecordBatch, WriteError> {
        let arrays = self
            .columns
            .iter()
            .map(|column| column.build(rows))
            .collect::<Result<Vec<_>, _>>()?;
        let options = RecordBatchOptions::new().with_row_count(Some(rows));
        let batch = RecordBatch::try_new_with_options(self.schema.clone(), arrays, &options)?;
        for column in self.columns.iter_mut() {
            column.clear();
        }
        fw_log!(
            log::Level::Debug,
            "block_finished",
            "rows={} columns={}",
            batch.num_rows(),
            batch.num_columns()
        );
        Ok(batch)
    }
}
