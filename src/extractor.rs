//! Source-side capability: pull one typed value out of an opaque row context.

use std::marker::PhantomData;

use crate::{error::BoxError, holder::ValueHolder, kind::FieldKind};

/// Reads a value of kind `K` from a row context of type `C` into a holder.
///
/// Implementations must fully overwrite the holder's state: set `is_set`
/// and the value for a present value, or clear `is_set` for an absent one.
/// Callers reuse the holder across rows.
pub trait Extractor<C: ?Sized, K: FieldKind> {
    /// Populate `holder` from `context`.
    fn extract(&self, context: &C, holder: &mut ValueHolder<K>) -> Result<(), BoxError>;
}

impl<C, K, E> Extractor<C, K> for Box<E>
where
    C: ?Sized,
    K: FieldKind,
    E: Extractor<C, K> + ?Sized,
{
    #[inline]
    fn extract(&self, context: &C, holder: &mut ValueHolder<K>) -> Result<(), BoxError> {
        (**self).extract(context, holder)
    }
}

/// Extractor backed by a closure, see [`from_fn`].
pub struct FnExtractor<F, C: ?Sized, K> {
    f: F,
    _marker: PhantomData<fn(&C, K)>,
}

impl<C, K, F> Extractor<C, K> for FnExtractor<F, C, K>
where
    C: ?Sized,
    K: FieldKind,
    F: Fn(&C, &mut ValueHolder<K>) -> Result<(), BoxError>,
{
    #[inline]
    fn extract(&self, context: &C, holder: &mut ValueHolder<K>) -> Result<(), BoxError> {
        (self.f)(context, holder)
    }
}

/// Build an extractor from a closure.
///
/// ```
/// use fieldwriter::{extractor, kind::Int64};
///
/// let by_index = extractor::from_fn::<[Option<i64>], Int64, _>(|row, holder| {
///     match row[0] {
///         Some(value) => holder.set(value),
///         None => holder.clear(),
///     }
///     Ok(())
/// });
/// # let _ = by_index;
/// ```
pub fn from_fn<C, K, F>(f: F) -> FnExtractor<F, C, K>
where
    C: ?Sized,
    K: FieldKind,
    F: Fn(&C, &mut ValueHolder<K>) -> Result<(), BoxError>,
{
    FnExtractor {
        f,
        _marker: PhantomData,
    }
}
