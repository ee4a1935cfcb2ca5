use std::sync::{Arc, Mutex};

use arrow::{
    array::{Array, AsArray},
    datatypes::{Float64Type, Int64Type},
};
use fieldwriter::{
    buffer::{BinaryColumn, BooleanColumn, ColumnBuffer, PrimitiveColumn, StringColumn},
    constraint,
    extractor::{self, Extractor},
    kind::{Binary, Boolean, Float64, Int64, Utf8},
    FieldWriter, ValueHolder,
};

/// Row context that mimics an extractor which may set `is_set` without a value.
#[derive(Debug, Clone)]
struct Cell {
    is_set: bool,
    value: Option<String>,
}

fn cell_extractor() -> impl Extractor<Cell, Utf8> {
    extractor::from_fn::<Cell, Utf8, _>(|cell, holder| {
        holder.is_set = cell.is_set;
        holder.value = cell.value.clone();
        Ok(())
    })
}

fn random_cell() -> Cell {
    let value = fastrand::bool().then(|| {
        std::iter::repeat_with(fastrand::alphanumeric)
            .take(fastrand::usize(0..16))
            .collect()
    });
    Cell {
        is_set: fastrand::bool(),
        value,
    }
}

fn expected(cell: &Cell) -> Option<&str> {
    cell.value.as_deref().filter(|_| cell.is_set)
}

#[test]
fn randomized_cells_store_value_or_null() {
    let cells: Vec<Cell> = std::iter::repeat_with(random_cell).take(512).collect();
    let mut column = StringColumn::default();
    let mut writer = FieldWriter::<Cell, Utf8, _>::new(cell_extractor(), &mut column, None);
    for (row, cell) in cells.iter().enumerate() {
        assert!(writer.write(cell, row).expect("write"));
    }
    drop(writer);

    for (row, cell) in cells.iter().enumerate() {
        assert_eq!(column.get(row), expected(cell).map(str::as_bytes), "row {row}");
    }

    let array = column.finish().expect("finish");
    let strings = array.as_string::<i32>();
    assert_eq!(strings.len(), cells.len());
    for (row, cell) in cells.iter().enumerate() {
        match expected(cell) {
            Some(value) => assert_eq!(strings.value(row), value),
            None => assert!(strings.is_null(row)),
        }
    }
}

#[test]
fn constraint_sees_exactly_the_holder_state() {
    let cells: Vec<Cell> = std::iter::repeat_with(random_cell).take(256).collect();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let predicate = constraint::from_fn(move |value: Option<&str>| {
        recorder
            .lock()
            .expect("lock")
            .push(value.map(str::to_owned));
        Ok(value.map_or(false, |value| value.len() % 2 == 0))
    });

    let mut column = StringColumn::default();
    let mut writer =
        FieldWriter::<Cell, Utf8, _>::new(cell_extractor(), &mut column, Some(predicate));
    let results: Vec<bool> = cells
        .iter()
        .enumerate()
        .map(|(row, cell)| writer.write(cell, row).expect("write"))
        .collect();
    drop(writer);

    let seen = seen.lock().expect("lock");
    for ((cell, matched), observed) in cells.iter().zip(&results).zip(seen.iter()) {
        let value = expected(cell);
        assert_eq!(observed.as_deref(), value);
        assert_eq!(*matched, value.map_or(false, |value| value.len() % 2 == 0));
    }
}

#[test]
fn unconstrained_writer_always_matches() {
    let mut column = PrimitiveColumn::<Int64Type>::default();
    let mut writer = FieldWriter::new(
        extractor::from_fn::<Option<i64>, Int64, _>(|row, holder| {
            match row {
                Some(value) => holder.set(*value),
                None => holder.clear(),
            }
            Ok(())
        }),
        &mut column,
        None,
    );
    for row in 0..128 {
        let value = fastrand::bool().then(|| fastrand::i64(..));
        assert!(writer.write(&value, row).expect("write"));
    }
}

#[test]
fn out_of_order_rows_and_overwrites_keep_other_rows_intact() {
    let mut column = BinaryColumn::default();
    let mut writer = FieldWriter::new(
        extractor::from_fn::<Option<Vec<u8>>, Binary, _>(|row, holder| {
            holder.is_set = true;
            holder.value = row.clone();
            Ok(())
        }),
        &mut column,
        None,
    );
    writer.write(&Some(vec![3, 3, 3]), 3).expect("write");
    writer.write(&Some(vec![1]), 1).expect("write");
    writer.write(&Some(vec![9, 9]), 3).expect("write");
    writer.write(&None, 1).expect("write");
    drop(writer);

    assert_eq!(column.len(), 4);
    assert_eq!(column.get(0), None);
    assert_eq!(column.get(1), None);
    assert_eq!(column.get(2), None);
    assert_eq!(column.get(3), Some(&[9, 9][..]));

    let array = column.finish().expect("finish");
    let binary = array.as_binary::<i32>();
    assert_eq!(binary.null_count(), 3);
    assert_eq!(binary.value(3), &[9, 9]);
}

#[test]
fn fixed_width_kinds_follow_the_same_null_rule() {
    let mut flags = BooleanColumn::default();
    let mut flag_writer = FieldWriter::new(
        extractor::from_fn::<(bool, bool), Boolean, _>(
            |(is_set, value), holder: &mut ValueHolder<Boolean>| {
                holder.is_set = *is_set;
                holder.value = *value;
                Ok(())
            },
        ),
        &mut flags,
        Some(constraint::from_fn(|value: Option<&bool>| {
            Ok(value.copied().unwrap_or(true))
        })),
    );
    assert!(flag_writer.write(&(true, true), 0).expect("write"));
    assert!(!flag_writer.write(&(true, false), 1).expect("write"));
    assert!(flag_writer.write(&(false, false), 2).expect("write"));
    drop(flag_writer);
    assert_eq!(flags.get(0), Some(true));
    assert_eq!(flags.get(1), Some(false));
    assert_eq!(flags.get(2), None);

    let mut floats = PrimitiveColumn::<Float64Type>::default();
    let mut float_writer = FieldWriter::new(
        extractor::from_fn::<Option<f64>, Float64, _>(|row, holder| {
            match row {
                Some(value) => holder.set(*value),
                None => holder.clear(),
            }
            Ok(())
        }),
        &mut floats,
        None,
    );
    float_writer.write(&Some(1.5), 0).expect("write");
    float_writer.write(&None, 1).expect("write");
    drop(float_writer);

    let array = floats.finish().expect("finish");
    let floats = array.as_primitive::<Float64Type>();
    assert_eq!(floats.value(0), 1.5);
    assert!(floats.is_null(1));
}
