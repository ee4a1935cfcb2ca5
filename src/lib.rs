#![deny(missing_docs)]
//! Typed, null-aware field writers that move values from an opaque row
//! context into Arrow column buffers while classifying each row against an
//! optional per-column constraint.
//!
//! The core is [`FieldWriter`]: one generic adapter per column that binds an
//! [`Extractor`], a column buffer and an optional constraint, and exposes a
//! single `write(context, row) -> bool`. Around it sit the pieces needed to
//! drive whole rows: [`Block`] owns one buffer per schema field,
//! [`RowWriter`] ANDs column results per row, and [`Block::finish`] produces
//! an Arrow `RecordBatch`.
//!
//! ```
//! use std::sync::Arc;
//!
//! use arrow::datatypes::{DataType, Field, Schema};
//! use fieldwriter::{
//!     constraint::ValueSet, extractor, kind, Block, RowWriter, TypedExtractor,
//! };
//!
//! let schema = Arc::new(Schema::new(vec![Field::new("name", DataType::Utf8, true)]));
//! let mut block = Block::new(schema)?;
//! let mut writer = RowWriter::builder()
//!     .with_extractor(
//!         "name",
//!         TypedExtractor::Utf8(Box::new(extractor::from_fn::<Option<&str>, kind::Utf8, _>(
//!             |row, holder| {
//!                 holder.is_set = row.is_some();
//!                 holder.value = row.map(str::to_owned);
//!                 Ok(())
//!             },
//!         ))),
//!     )
//!     .with_constraint("name", Arc::new(ValueSet::of(["hello"])))
//!     .build(&mut block)?;
//!
//! writer.append(&Some("hello"))?;
//! writer.append(&Some("world"))?;
//! let rows = writer.rows();
//! drop(writer);
//!
//! let batch = block.finish(rows)?;
//! assert_eq!(batch.num_rows(), 1);
//! # Ok::<(), fieldwriter::WriteError>(())
//! ```

mod logging;

pub mod block;
pub mod buffer;
pub mod constraint;
/// Fixed-point decimal values.
pub mod decimal;
/// Error types.
pub mod error;
pub mod extractor;
pub mod factory;
/// Per-writer scratch value holder.
pub mod holder;
pub mod kind;
/// Block configuration.
pub mod option;
pub mod row;
pub mod scalar;
pub mod writer;

pub use crate::{
    block::{Block, ColumnVector},
    constraint::{ConstraintProjector, ScalarConstraint, ValueSet},
    decimal::Decimal,
    error::{BoxError, WriteError},
    extractor::Extractor,
    factory::{make_writer, IntoTypedExtractor, TypedExtractor},
    holder::ValueHolder,
    kind::FieldKind,
    option::BlockOptions,
    row::{RowWriter, RowWriterBuilder},
    scalar::{ScalarRef, ScalarValue},
    writer::{DynFieldWriter, FieldWriter},
};
