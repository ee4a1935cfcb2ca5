use arrow::{datatypes::DataType, error::ArrowError};
use thiserror::Error;

use crate::buffer::BufferError;

/// Boxed error produced by collaborators (extractors, constraints).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned while writing a field or assembling a block.
///
/// Collaborator failures are carried verbatim as the error source.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The extractor failed to read a value from the row context.
    #[error("extract error: {0}")]
    Extract(#[source] BoxError),
    /// The column buffer rejected the value or null marker.
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
    /// The constraint predicate failed while evaluating the value.
    #[error("constraint error: {0}")]
    Constraint(#[source] BoxError),
    /// Arrow failed while assembling the finished batch.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// The extractor registered for a column produces a different kind than the column stores.
    #[error("extractor for column {column} produces {actual}, column expects {expected}")]
    ExtractorMismatch {
        /// Column name.
        column: String,
        /// Kind stored by the column.
        expected: &'static str,
        /// Kind produced by the extractor.
        actual: &'static str,
    },
    /// A block column has no extractor registered.
    #[error("no extractor registered for column {0}")]
    MissingExtractor(String),
    /// An extractor or constraint names a column absent from the block.
    #[error("no such column in block: {0}")]
    UnknownColumn(String),
    /// The Arrow data type has no field writer.
    #[error("unsupported data type for column {column}: {data_type:?}")]
    UnsupportedType {
        /// Column name.
        column: String,
        /// The Arrow data type without a writer.
        data_type: DataType,
    },
}
