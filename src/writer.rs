//! The field writer: extract, store value-or-null, apply the constraint.

use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    buffer::ColumnBuffer,
    constraint::{ConstraintApplier, ConstraintProjector},
    extractor::Extractor,
    holder::ValueHolder,
    kind::FieldKind,
    WriteError,
};

/// Object-safe view of a field writer, used by row writers to hold
/// writers of different kinds side by side.
pub trait DynFieldWriter<C: ?Sized> {
    /// Write the value for `row` and return whether it satisfied the column constraint.
    fn write(&mut self, context: &C, row: usize) -> Result<bool, WriteError>;
}

/// Moves one value per call from a row context into a column buffer of kind `K`.
///
/// The writer owns a single [`ValueHolder`] that is reused for every row, so
/// one writer must never be driven from two rows concurrently; `write` takes
/// `&mut self` to enforce that. Writers for different columns share nothing.
pub struct FieldWriter<'a, C, K, E = Box<dyn Extractor<C, K> + 'a>>
where
    C: ?Sized,
    K: FieldKind,
{
    holder: ValueHolder<K>,
    extractor: E,
    buffer: &'a mut K::Buffer,
    constraint: ConstraintApplier<K::Value>,
    _context: PhantomData<fn(&C)>,
}

impl<'a, C, K, E> FieldWriter<'a, C, K, E>
where
    C: ?Sized,
    K: FieldKind,
    E: Extractor<C, K>,
{
    /// Bind `extractor`, `buffer` and an optional constraint.
    ///
    /// The constraint strategy is resolved here once; `write` never inspects
    /// whether a constraint was configured.
    pub fn new(
        extractor: E,
        buffer: &'a mut K::Buffer,
        constraint: Option<Arc<dyn ConstraintProjector<K::Value>>>,
    ) -> Self {
        Self {
            holder: ValueHolder::default(),
            extractor,
            buffer,
            constraint: ConstraintApplier::new(constraint),
            _context: PhantomData,
        }
    }

    /// Write the value extracted from `context` into `row`.
    ///
    /// Stores the encoded value when the holder is set and populated, a null
    /// marker otherwise, then evaluates the constraint against the holder
    /// (never against the encoded form). Extractor, buffer and constraint
    /// failures are returned unchanged.
    #[inline]
    pub fn write(&mut self, context: &C, row: usize) -> Result<bool, WriteError> {
        self.extractor
            .extract(context, &mut self.holder)
            .map_err(WriteError::Extract)?;
        match self.holder.get() {
            Some(value) => K::store(self.buffer, row, value)?,
            None => self.buffer.set_null(row)?,
        }
        self.constraint.apply(self.holder.get())
    }

    /// Holder state left by the most recent extraction.
    pub fn holder(&self) -> &ValueHolder<K> {
        &self.holder
    }

    /// Whether a constraint was bound at construction.
    pub fn is_constrained(&self) -> bool {
        self.constraint.is_constrained()
    }
}

impl<'a, C, K, E> DynFieldWriter<C> for FieldWriter<'a, C, K, E>
where
    C: ?Sized,
    K: FieldKind,
    E: Extractor<C, K>,
{
    #[inline]
    fn write(&mut self, context: &C, row: usize) -> Result<bool, WriteError> {
        FieldWriter::write(self, context, row)
    }
}

impl<'a, C, K, E> fmt::Debug for FieldWriter<'a, C, K, E>
where
    C: ?Sized,
    K: FieldKind,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldWriter")
            .field("kind", &K::NAME)
            .field("constrained", &self.constraint.is_constrained())
            .field("rows", &self.buffer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        sync::Arc,
    };

    use super::FieldWriter;
    use crate::{
        buffer::{BufferError, ColumnBuffer, PrimitiveColumn, StringColumn},
        constraint,
        error::BoxError,
        extractor::{self, Extractor},
        holder::ValueHolder,
        kind::{FieldKind, Int32, Utf8},
        WriteError,
    };

    struct Slot {
        is_set: bool,
        value: Option<String>,
    }

    fn utf8_extractor() -> impl Extractor<Slot, Utf8> {
        extractor::from_fn::<Slot, Utf8, _>(|slot, holder| {
            holder.is_set = slot.is_set;
            holder.value = slot.value.clone();
            Ok(())
        })
    }

    fn slot(is_set: bool, value: Option<&str>) -> Slot {
        Slot {
            is_set,
            value: value.map(str::to_owned),
        }
    }

    #[test]
    fn present_value_is_encoded_as_utf8() {
        let mut column = StringColumn::default();
        let mut writer = FieldWriter::<Slot, Utf8, _>::new(utf8_extractor(), &mut column, None);
        assert!(writer.write(&slot(true, Some("hello")), 0).unwrap());
        drop(writer);

        assert_eq!(column.get(0), Some(&[0x68, 0x65, 0x6c, 0x6c, 0x6f][..]));
        assert!(!column.is_null(0));
    }

    #[test]
    fn unset_and_set_without_value_both_store_null() {
        let mut column = StringColumn::default();
        let mut writer = FieldWriter::<Slot, Utf8, _>::new(utf8_extractor(), &mut column, None);
        assert!(writer.write(&slot(false, Some("stale")), 0).unwrap());
        assert!(writer.write(&slot(true, None), 1).unwrap());
        drop(writer);

        assert!(column.is_null(0));
        assert!(column.is_null(1));
        assert_eq!(column.len(), 2);
    }

    #[test]
    fn constraint_receives_raw_value_or_none() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = seen.clone();
        let predicate = constraint::from_fn(move |value: Option<&str>| {
            log.lock().unwrap().push(value.map(str::to_owned));
            Ok(value == Some("hello"))
        });

        let mut column = StringColumn::default();
        let mut writer =
            FieldWriter::<Slot, Utf8, _>::new(utf8_extractor(), &mut column, Some(predicate));
        assert!(writer.is_constrained());
        assert!(writer.write(&slot(true, Some("hello")), 0).unwrap());
        assert!(!writer.write(&slot(true, Some("world")), 1).unwrap());
        assert!(!writer.write(&slot(false, Some("hello")), 2).unwrap());
        assert!(!writer.write(&slot(true, None), 3).unwrap());
        drop(writer);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Some("hello".to_owned()),
                Some("world".to_owned()),
                None,
                None
            ]
        );
        // A rejected row is still written.
        assert_eq!(column.get(1), Some(&b"world"[..]));
    }

    /// Records every buffer call so tests can assert on exact interactions.
    #[derive(Default)]
    struct RecordingColumn {
        calls: RefCell<Vec<String>>,
        inner: PrimitiveColumn<arrow::datatypes::Int32Type>,
    }

    impl ColumnBuffer for RecordingColumn {
        type Value = i32;

        fn data_type(&self) -> &arrow::datatypes::DataType {
            self.inner.data_type()
        }

        fn set_value(&mut self, row: usize, value: &i32) -> Result<(), BufferError> {
            self.calls.borrow_mut().push(format!("value({row},{value})"));
            self.inner.set_value(row, value)
        }

        fn set_null(&mut self, row: usize) -> Result<(), BufferError> {
            self.calls.borrow_mut().push(format!("null({row})"));
            self.inner.set_null(row)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }

        fn is_null(&self, row: usize) -> bool {
            self.inner.is_null(row)
        }

        fn truncate(&mut self, len: usize) {
            self.inner.truncate(len)
        }

        fn build(&self, len: usize) -> Result<arrow::array::ArrayRef, BufferError> {
            self.inner.build(len)
        }

        fn clear(&mut self) {
            self.inner.clear()
        }
    }

    struct Recorded;

    impl FieldKind for Recorded {
        const NAME: &'static str = "Recorded";

        type Slot = i32;
        type Value = i32;
        type Buffer = RecordingColumn;

        fn value(slot: &i32) -> Option<&i32> {
            Some(slot)
        }

        fn store(buffer: &mut RecordingColumn, row: usize, value: &i32) -> Result<(), BufferError> {
            buffer.set_value(row, value)
        }

        fn scalar(value: &i32) -> crate::scalar::ScalarRef<'_> {
            Int32::scalar(value)
        }
    }

    #[test]
    fn exactly_one_buffer_call_per_write() {
        let mut column = RecordingColumn::default();
        let mut writer = FieldWriter::new(
            extractor::from_fn::<Option<i32>, Recorded, _>(|row, holder| {
                match row {
                    Some(value) => holder.set(*value),
                    None => holder.is_set = false,
                }
                Ok(())
            }),
            &mut column,
            None,
        );
        assert!(writer.write(&None, 0).unwrap());
        assert!(writer.write(&Some(7), 1).unwrap());
        drop(writer);

        assert_eq!(*column.calls.borrow(), vec!["null(0)", "value(1,7)"]);
    }

    #[test]
    fn holder_does_not_leak_between_rows() {
        let mut column = PrimitiveColumn::default();
        let calls = Cell::new(0);
        let mut writer = FieldWriter::new(
            extractor::from_fn::<Option<i32>, Int32, _>(|row, holder| {
                calls.set(calls.get() + 1);
                match row {
                    Some(value) => holder.set(*value),
                    None => holder.is_set = false,
                }
                Ok(())
            }),
            &mut column,
            None,
        );
        writer.write(&Some(11), 0).unwrap();
        writer.write(&None, 1).unwrap();
        assert!(!writer.holder().is_set);
        writer.write(&Some(13), 2).unwrap();
        drop(writer);

        assert_eq!(calls.get(), 3);
        assert_eq!(column.get(0), Some(11));
        assert_eq!(column.get(1), None);
        assert_eq!(column.get(2), Some(13));
    }

    #[test]
    fn extractor_failure_propagates_without_touching_buffer() {
        let mut column = PrimitiveColumn::default();
        let mut writer = FieldWriter::new(
            extractor::from_fn::<(), Int32, _>(|_, _| {
                Err::<(), BoxError>("source closed".into())
            }),
            &mut column,
            None,
        );
        let err = writer.write(&(), 0).unwrap_err();
        match err {
            WriteError::Extract(source) => assert_eq!(source.to_string(), "source closed"),
            other => panic!("unexpected error: {other}"),
        }
        drop(writer);
        assert!(column.is_empty());
    }

    #[test]
    fn buffer_failure_propagates() {
        let mut column = crate::buffer::DecimalColumn::with_capacity(3, 0, 1);
        let mut writer = FieldWriter::new(
            extractor::from_fn::<i128, crate::kind::Decimal128, _>(|value, holder| {
                holder.set(crate::decimal::Decimal::new(*value, 0));
                Ok(())
            }),
            &mut column,
            None,
        );
        assert!(writer.write(&999, 0).unwrap());
        let err = writer.write(&1000, 1).unwrap_err();
        assert!(matches!(
            err,
            WriteError::Buffer(BufferError::DecimalOverflow { row: 1, .. })
        ));
    }

    #[test]
    fn fixed_width_with_constraint_on_unset_holder() {
        let mut column = PrimitiveColumn::default();
        let predicate = constraint::from_fn(|value: Option<&i32>| Ok(value.is_none()));
        let mut writer = FieldWriter::new(
            extractor::from_fn::<(), Int32, _>(|_, holder: &mut ValueHolder<Int32>| {
                holder.is_set = false;
                holder.value = 99;
                Ok(())
            }),
            &mut column,
            Some(predicate),
        );
        assert!(writer.write(&(), 0).unwrap());
        drop(writer);
        assert_eq!(column.get(0), None);
    }

    #[test]
    fn constraint_failure_propagates_after_store() {
        let mut column = StringColumn::default();
        let predicate = constraint::from_fn(|value: Option<&str>| match value {
            Some("bad") => Err::<bool, BoxError>("cannot evaluate".into()),
            _ => Ok(true),
        });
        let mut writer =
            FieldWriter::<Slot, Utf8, _>::new(utf8_extractor(), &mut column, Some(predicate));
        assert!(writer.write(&slot(true, Some("good")), 0).unwrap());
        let err = writer.write(&slot(true, Some("bad")), 1).unwrap_err();
        match err {
            WriteError::Constraint(source) => assert_eq!(source.to_string(), "cannot evaluate"),
            other => panic!("unexpected error: {other}"),
        }
        drop(writer);

        assert_eq!(column.get(1), Some(&b"bad"[..]));
    }

    #[test]
    fn date64_round_trip() {
        use arrow::{
            array::{Array, AsArray},
            datatypes::Date64Type,
        };

        let mut column = PrimitiveColumn::<Date64Type>::default();
        let mut writer = FieldWriter::new(
            extractor::from_fn::<Option<i64>, crate::kind::Date64, _>(|row, holder| {
                match row {
                    Some(millis) => holder.set(*millis),
                    None => holder.clear(),
                }
                Ok(())
            }),
            &mut column,
            Some(constraint::from_fn(|value: Option<&i64>| {
                Ok(value.map_or(false, |millis| *millis >= 0))
            })),
        );
        assert!(writer.write(&Some(1_700_000_000_000), 0).unwrap());
        assert!(!writer.write(&None, 1).unwrap());
        assert!(!writer.write(&Some(-86_400_000), 2).unwrap());
        drop(writer);

        let array = column.finish().unwrap();
        let dates = array.as_primitive::<Date64Type>();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates.value(0), 1_700_000_000_000);
        assert!(dates.is_null(1));
        assert_eq!(dates.value(2), -86_400_000);
    }
}
