//! Pair a typed extractor with a block column and build the matching writer.

use std::{fmt, sync::Arc};

use crate::{
    block::ColumnVector,
    constraint::{ScalarConstraint, ScalarProjector},
    extractor::Extractor,
    kind::{self, FieldKind},
    logging::fw_log,
    writer::{DynFieldWriter, FieldWriter},
    WriteError,
};

macro_rules! define_typed_extractor {
    ($($variant:ident),* $(,)?) => {
        /// Extractor tagged with the field kind it produces.
        pub enum TypedExtractor<'a, C: ?Sized> {
            $(
                #[doc = concat!("Extractor producing [`kind::", stringify!($variant), "`] values.")]
                $variant(Box<dyn Extractor<C, kind::$variant> + 'a>),
            )*
        }

        impl<'a, C: ?Sized> TypedExtractor<'a, C> {
            /// Name of the field kind this extractor produces.
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $(TypedExtractor::$variant(_) => <kind::$variant as FieldKind>::NAME,)*
                }
            }
        }

        /// Build the writer for `column`, binding `extractor`, `vector` and an optional constraint.
        ///
        /// Fails with [`WriteError::ExtractorMismatch`] when the extractor kind
        /// differs from the kind the vector stores.
        pub fn make_writer<'a, C>(
            column: &str,
            extractor: TypedExtractor<'a, C>,
            vector: &'a mut ColumnVector,
            constraint: Option<Arc<dyn ScalarConstraint>>,
        ) -> Result<Box<dyn DynFieldWriter<C> + 'a>, WriteError>
        where
            C: ?Sized + 'a,
        {
            match (extractor, vector) {
                $(
                    (TypedExtractor::$variant(extractor), ColumnVector::$variant(buffer)) => {
                        let constraint =
                            constraint.map(ScalarProjector::<kind::$variant>::shared);
                        Ok(Box::new(FieldWriter::<C, kind::$variant>::new(
                            extractor, buffer, constraint,
                        )))
                    }
                )*
                (extractor, vector) => {
                    fw_log!(
                        log::Level::Debug,
                        "extractor_mismatch",
                        "column={} expected={} actual={}",
                        column,
                        vector.kind_name(),
                        extractor.kind_name()
                    );
                    Err(WriteError::ExtractorMismatch {
                        column: column.to_owned(),
                        expected: vector.kind_name(),
                        actual: extractor.kind_name(),
                    })
                }
            }
        }
    };
}

define_typed_extractor!(
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Date32,
    Date64,
    Decimal128,
    Utf8,
    Binary,
);

impl<'a, C: ?Sized> fmt::Debug for TypedExtractor<'a, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedExtractor").field(&self.kind_name()).finish()
    }
}

/// Conversion from a `(kind, extractor)` pair into a boxed [`TypedExtractor`].
pub trait IntoTypedExtractor<'a, C: ?Sized> {
    /// Perform the conversion.
    fn into_typed(self) -> TypedExtractor<'a, C>;
}

macro_rules! impl_into_typed {
    ($($variant:ident),* $(,)?) => {
        $(
            impl<'a, C, E> IntoTypedExtractor<'a, C> for (kind::$variant, E)
            where
                C: ?Sized,
                E: Extractor<C, kind::$variant> + 'a,
            {
                fn into_typed(self) -> TypedExtractor<'a, C> {
                    TypedExtractor::$variant(Box::new(self.1))
                }
            }
        )*
    };
}

impl_into_typed!(
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Date32,
    Date64,
    Decimal128,
    Utf8,
    Binary,
);
