//! Row writer: one field writer per block column, driven together per row.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    block::Block,
    constraint::ScalarConstraint,
    factory::{make_writer, TypedExtractor},
    logging::fw_log,
    writer::DynFieldWriter,
    WriteError,
};

/// Collects extractors and constraints by column name before binding them to a [`Block`].
pub struct RowWriterBuilder<'a, C: ?Sized> {
    extractors: HashMap<String, TypedExtractor<'a, C>>,
    constraints: HashMap<String, Arc<dyn ScalarConstraint>>,
}

impl<'a, C: ?Sized> Default for RowWriterBuilder<'a, C> {
    fn default() -> Self {
        Self {
            extractors: HashMap::new(),
            constraints: HashMap::new(),
        }
    }
}

impl<'a, C> RowWriterBuilder<'a, C>
where
    C: ?Sized + 'a,
{
    /// Register the extractor for `column`, replacing any earlier one.
    pub fn with_extractor(
        mut self,
        column: impl Into<String>,
        extractor: TypedExtractor<'a, C>,
    ) -> Self {
        self.extractors.insert(column.into(), extractor);
        self
    }

    /// Attach a constraint to `column`, replacing any earlier one.
    pub fn with_constraint(
        mut self,
        column: impl Into<String>,
        constraint: Arc<dyn ScalarConstraint>,
    ) -> Self {
        self.constraints.insert(column.into(), constraint);
        self
    }

    /// Bind one field writer to every column of `block`.
    ///
    /// Every block column needs an extractor, and every registered name must
    /// be a block column.
    pub fn build(mut self, block: &'a mut Block) -> Result<RowWriter<'a, C>, WriteError> {
        let schema = block.schema().clone();
        if let Some(name) = self
            .extractors
            .keys()
            .chain(self.constraints.keys())
            .find(|name| schema.index_of(name).is_err())
        {
            return Err(WriteError::UnknownColumn(name.clone()));
        }

        let mut writers = Vec::with_capacity(schema.fields().len());
        for (field, vector) in schema.fields().iter().zip(block.columns_mut()) {
            let name = field.name();
            let extractor = self
                .extractors
                .remove(name)
                .ok_or_else(|| WriteError::MissingExtractor(name.clone()))?;
            let constraint = self.constraints.remove(name);
            writers.push(make_writer(name, extractor, vector, constraint)?);
        }
        fw_log!(
            log::Level::Debug,
            "row_writer_built",
            "columns={}",
            writers.len()
        );
        Ok(RowWriter { writers, rows: 0 })
    }
}

impl<'a, C: ?Sized> fmt::Debug for RowWriterBuilder<'a, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowWriterBuilder")
            .field("extractors", &self.extractors.keys().collect::<Vec<_>>())
            .field("constraints", &self.constraints.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Writes whole rows into a [`Block`] through per-column field writers.
///
/// Every column is written for every row even after one has rejected it, so
/// all buffers stay the same length.
pub struct RowWriter<'a, C: ?Sized> {
    writers: Vec<Box<dyn DynFieldWriter<C> + 'a>>,
    rows: usize,
}

impl<'a, C> RowWriter<'a, C>
where
    C: ?Sized + 'a,
{
    /// Start collecting extractors and constraints.
    pub fn builder() -> RowWriterBuilder<'a, C> {
        RowWriterBuilder::default()
    }

    /// Write `context` into `row` of every column.
    ///
    /// Returns true when every column constraint matched. Errors stop the row
    /// at the failing column.
    pub fn write_row(&mut self, context: &C, row: usize) -> Result<bool, WriteError> {
        let mut matched = true;
        for writer in self.writers.iter_mut() {
            matched &= writer.write(context, row)?;
        }
        Ok(matched)
    }

    /// Write `context` at the cursor and advance it only when the row matched.
    ///
    /// A rejected row stays in the buffers until the next call overwrites it;
    /// [`Block::finish`] with [`rows`](Self::rows) drops it.
    pub fn append(&mut self, context: &C) -> Result<bool, WriteError> {
        let matched = self.write_row(context, self.rows)?;
        if matched {
            self.rows += 1;
        } else {
            fw_log!(log::Level::Trace, "row_rejected", "row={}", self.rows);
        }
        Ok(matched)
    }

    /// Rows committed through [`append`](Self::append).
    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl<'a, C: ?Sized> fmt::Debug for RowWriter<'a, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowWriter")
            .field("columns", &self.writers.len())
            .field("rows", &self.rows)
            .finish()
    }
}
