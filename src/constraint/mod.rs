//! Constraint predicates and the per-writer applier bound at construction.

mod value_set;

use std::{marker::PhantomData, sync::Arc};

pub use value_set::{Range, ValueSet};

use crate::{error::BoxError, kind::FieldKind, scalar::ScalarRef, WriteError};

/// Predicate over a nullable value; `None` stands for SQL NULL.
pub trait ConstraintProjector<V: ?Sized>: Send + Sync {
    /// Returns whether the value satisfies the constraint.
    fn apply(&self, value: Option<&V>) -> Result<bool, BoxError>;
}

/// Constraint backed by a closure, see [`from_fn`].
pub struct FnProjector<F, V: ?Sized> {
    f: F,
    _marker: PhantomData<fn(&V)>,
}

impl<V, F> ConstraintProjector<V> for FnProjector<F, V>
where
    V: ?Sized,
    F: Fn(Option<&V>) -> Result<bool, BoxError> + Send + Sync,
{
    fn apply(&self, value: Option<&V>) -> Result<bool, BoxError> {
        (self.f)(value)
    }
}

/// Build a shareable constraint from a closure.
pub fn from_fn<V, F>(f: F) -> Arc<dyn ConstraintProjector<V>>
where
    V: ?Sized + 'static,
    F: Fn(Option<&V>) -> Result<bool, BoxError> + Send + Sync + 'static,
{
    Arc::new(FnProjector {
        f,
        _marker: PhantomData,
    })
}

/// Type-agnostic constraint over [`ScalarRef`] values.
///
/// Row writers attach these by column name without knowing the column kind;
/// [`ScalarProjector`] adapts one to a typed writer.
pub trait ScalarConstraint: Send + Sync {
    /// Returns whether the value satisfies the constraint.
    fn apply(&self, value: Option<ScalarRef<'_>>) -> Result<bool, BoxError>;
}

impl ScalarConstraint for ValueSet {
    fn apply(&self, value: Option<ScalarRef<'_>>) -> Result<bool, BoxError> {
        Ok(self.contains(value))
    }
}

/// Adapts a [`ScalarConstraint`] to the typed values of kind `K`.
pub struct ScalarProjector<K> {
    inner: Arc<dyn ScalarConstraint>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: FieldKind> ScalarProjector<K> {
    /// Wrap `inner` for writers of kind `K`.
    pub fn new(inner: Arc<dyn ScalarConstraint>) -> Self {
        Self {
            inner,
            _kind: PhantomData,
        }
    }

    /// Wrap `inner` and erase the adapter type.
    pub fn shared(inner: Arc<dyn ScalarConstraint>) -> Arc<dyn ConstraintProjector<K::Value>> {
        Arc::new(Self::new(inner))
    }
}

impl<K: FieldKind> ConstraintProjector<K::Value> for ScalarProjector<K> {
    #[inline]
    fn apply(&self, value: Option<&K::Value>) -> Result<bool, BoxError> {
        self.inner.apply(value.map(K::scalar))
    }
}

/// Constraint strategy fixed when a writer is built.
///
/// An unconstrained writer never touches a predicate; a constrained one maps
/// an absent value to `None` rather than to a default.
pub enum ConstraintApplier<V: ?Sized> {
    /// No constraint configured: every row passes.
    Unconstrained,
    /// Delegate to the predicate with the null-or-value view of the holder.
    Constrained(Arc<dyn ConstraintProjector<V>>),
}

impl<V: ?Sized> ConstraintApplier<V> {
    /// Select the strategy for an optional raw constraint.
    pub fn new(raw: Option<Arc<dyn ConstraintProjector<V>>>) -> Self {
        match raw {
            Some(projector) => ConstraintApplier::Constrained(projector),
            None => ConstraintApplier::Unconstrained,
        }
    }

    /// Returns true when a predicate is bound.
    pub fn is_constrained(&self) -> bool {
        matches!(self, ConstraintApplier::Constrained(_))
    }

    /// Evaluate the strategy for the holder's null-or-value view.
    #[inline]
    pub fn apply(&self, value: Option<&V>) -> Result<bool, WriteError> {
        match self {
            ConstraintApplier::Unconstrained => Ok(true),
            ConstraintApplier::Constrained(projector) => {
                projector.apply(value).map_err(WriteError::Constraint)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::{from_fn, ConstraintApplier, ScalarProjector, ValueSet};
    use crate::{error::BoxError, kind::Int32, WriteError};

    #[test]
    fn unconstrained_always_passes() {
        let applier = ConstraintApplier::<str>::new(None);
        assert!(!applier.is_constrained());
        assert!(applier.apply(None).unwrap());
        assert!(applier.apply(Some("anything")).unwrap());
    }

    #[test]
    fn constrained_sees_null_as_none() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let applier = ConstraintApplier::new(Some(from_fn(move |value: Option<&str>| {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(value.is_none())
        })));
        assert!(applier.is_constrained());
        assert!(applier.apply(None).unwrap());
        assert!(!applier.apply(Some("")).unwrap());
        assert_eq!(seen.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn predicate_failure_is_propagated() {
        let applier = ConstraintApplier::new(Some(from_fn(|_: Option<&i32>| {
            Err::<bool, BoxError>("boom".into())
        })));
        let err = applier.apply(Some(&1)).unwrap_err();
        match err {
            WriteError::Constraint(source) => assert_eq!(source.to_string(), "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scalar_projector_adapts_value_sets() {
        let set = Arc::new(ValueSet::of([1i32, 3]));
        let applier = ConstraintApplier::new(Some(ScalarProjector::<Int32>::shared(set)));
        assert!(applier.apply(Some(&3)).unwrap());
        assert!(!applier.apply(Some(&2)).unwrap());
        assert!(!applier.apply(None).unwrap());
    }
}
