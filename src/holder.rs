use std::fmt;

use crate::kind::FieldKind;

/// Reusable scratch slot an extractor fills for each row.
///
/// A writer owns exactly one holder and hands it to its extractor on every
/// call. The extractor is responsible for leaving `is_set` and `value`
/// consistent; nothing else mutates the holder.
pub struct ValueHolder<K: FieldKind> {
    /// Whether the extractor produced a value for the current row.
    pub is_set: bool,
    /// Decoded value; only meaningful while `is_set` is true.
    pub value: K::Slot,
}

impl<K: FieldKind> ValueHolder<K> {
    /// The value when the holder is set and its slot is populated, `None` otherwise.
    ///
    /// Reference kinds (strings, bytes, decimals) may be flagged as set while
    /// their slot is empty; that state is treated as NULL.
    #[inline]
    pub fn get(&self) -> Option<&K::Value> {
        if self.is_set {
            K::value(&self.value)
        } else {
            None
        }
    }

    /// Mark the holder as set with `value`.
    #[inline]
    pub fn set(&mut self, value: impl Into<K::Slot>) {
        self.is_set = true;
        self.value = value.into();
    }

    /// Mark the holder as unset and drop any previous value.
    #[inline]
    pub fn clear(&mut self) {
        self.is_set = false;
        self.value = K::Slot::default();
    }
}

impl<K: FieldKind> Default for ValueHolder<K> {
    fn default() -> Self {
        Self {
            is_set: false,
            value: K::Slot::default(),
        }
    }
}

impl<K: FieldKind> fmt::Debug for ValueHolder<K>
where
    K::Slot: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueHolder")
            .field("kind", &K::NAME)
            .field("is_set", &self.is_set)
            .field("value", &self.value)
            .finish()
    }
}
