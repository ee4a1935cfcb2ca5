//! Field kinds: the closed set of column types a field writer can target.
//!
//! A kind is a zero-sized marker tying together the holder slot an extractor
//! fills, the value a constraint sees, the column buffer the value lands in,
//! and the one piece of type-specific logic the writer needs: how to encode a
//! present value into that buffer.

use arrow::datatypes::{
    Date32Type, Date64Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
};

use crate::{
    buffer::{
        BinaryColumn, BooleanColumn, BufferError, ColumnBuffer, DecimalColumn, PrimitiveColumn,
        StringColumn,
    },
    decimal::Decimal,
    scalar::ScalarRef,
};

/// Type-specific half of a field writer.
pub trait FieldKind: 'static {
    /// Human readable kind name, used in diagnostics.
    const NAME: &'static str;

    /// Storage inside the [`ValueHolder`](crate::holder::ValueHolder).
    type Slot: Default;

    /// Decoded value handed to constraints.
    type Value: ?Sized;

    /// Column buffer this kind writes into.
    type Buffer: ColumnBuffer;

    /// Project a populated slot to its value; `None` when the slot carries no value.
    fn value(slot: &Self::Slot) -> Option<&Self::Value>;

    /// Encode `value` and store it at `row`.
    fn store(buffer: &mut Self::Buffer, row: usize, value: &Self::Value)
        -> Result<(), BufferError>;

    /// Dynamic view of `value` for type-agnostic constraints.
    fn scalar(value: &Self::Value) -> ScalarRef<'_>;
}

macro_rules! fixed_width_kind {
    ($(#[$meta:meta])* $name:ident, $native:ty, $arrow:ty, $scalar:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl FieldKind for $name {
            const NAME: &'static str = stringify!($name);

            type Slot = $native;
            type Value = $native;
            type Buffer = PrimitiveColumn<$arrow>;

            #[inline]
            fn value(slot: &$native) -> Option<&$native> {
                Some(slot)
            }

            #[inline]
            fn store(
                buffer: &mut Self::Buffer,
                row: usize,
                value: &$native,
            ) -> Result<(), BufferError> {
                buffer.set_value(row, value)
            }

            fn scalar(value: &$native) -> ScalarRef<'_> {
                ScalarRef::$scalar(*value)
            }
        }
    };
}

fixed_width_kind!(
    /// 8-bit signed integer column.
    Int8, i8, Int8Type, Int8
);
fixed_width_kind!(
    /// 16-bit signed integer column.
    Int16, i16, Int16Type, Int16
);
fixed_width_kind!(
    /// 32-bit signed integer column.
    Int32, i32, Int32Type, Int32
);
fixed_width_kind!(
    /// 64-bit signed integer column.
    Int64, i64, Int64Type, Int64
);
fixed_width_kind!(
    /// 32-bit float column.
    Float32, f32, Float32Type, Float32
);
fixed_width_kind!(
    /// 64-bit float column.
    Float64, f64, Float64Type, Float64
);
fixed_width_kind!(
    /// Date column in days since the UNIX epoch.
    Date32, i32, Date32Type, Date32
);
fixed_width_kind!(
    /// Date column in milliseconds since the UNIX epoch.
    Date64, i64, Date64Type, Date64
);

/// Boolean column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boolean;

impl FieldKind for Boolean {
    const NAME: &'static str = "Boolean";

    type Slot = bool;
    type Value = bool;
    type Buffer = BooleanColumn;

    #[inline]
    fn value(slot: &bool) -> Option<&bool> {
        Some(slot)
    }

    #[inline]
    fn store(buffer: &mut BooleanColumn, row: usize, value: &bool) -> Result<(), BufferError> {
        buffer.set_value(row, value)
    }

    fn scalar(value: &bool) -> ScalarRef<'_> {
        ScalarRef::Boolean(*value)
    }
}

/// UTF-8 string column; values are stored as their UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf8;

impl FieldKind for Utf8 {
    const NAME: &'static str = "Utf8";

    type Slot = Option<String>;
    type Value = str;
    type Buffer = StringColumn;

    #[inline]
    fn value(slot: &Option<String>) -> Option<&str> {
        slot.as_deref()
    }

    #[inline]
    fn store(buffer: &mut StringColumn, row: usize, value: &str) -> Result<(), BufferError> {
        buffer.set_value(row, value.as_bytes())
    }

    fn scalar(value: &str) -> ScalarRef<'_> {
        ScalarRef::Utf8(value)
    }
}

/// Variable-length binary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binary;

impl FieldKind for Binary {
    const NAME: &'static str = "Binary";

    type Slot = Option<Vec<u8>>;
    type Value = [u8];
    type Buffer = BinaryColumn;

    #[inline]
    fn value(slot: &Option<Vec<u8>>) -> Option<&[u8]> {
        slot.as_deref()
    }

    #[inline]
    fn store(buffer: &mut BinaryColumn, row: usize, value: &[u8]) -> Result<(), BufferError> {
        buffer.set_value(row, value)
    }

    fn scalar(value: &[u8]) -> ScalarRef<'_> {
        ScalarRef::Binary(value)
    }
}

/// 128-bit decimal column; values are rescaled to the column scale on store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal128;

impl FieldKind for Decimal128 {
    const NAME: &'static str = "Decimal128";

    type Slot = Option<Decimal>;
    type Value = Decimal;
    type Buffer = DecimalColumn;

    #[inline]
    fn value(slot: &Option<Decimal>) -> Option<&Decimal> {
        slot.as_ref()
    }

    fn store(buffer: &mut DecimalColumn, row: usize, value: &Decimal) -> Result<(), BufferError> {
        let scale = buffer.scale();
        let unscaled = value
            .rescale(scale)
            .ok_or(BufferError::DecimalRescale { row, scale })?;
        buffer.set_value(row, &unscaled)
    }

    fn scalar(value: &Decimal) -> ScalarRef<'_> {
        ScalarRef::Decimal(*value)
    }
}
