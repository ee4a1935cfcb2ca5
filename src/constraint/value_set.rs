use std::{cmp::Ordering, ops::Bound};

use crate::scalar::{ScalarRef, ScalarValue};

/// Interval over scalar values.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    /// Lower bound.
    pub low: Bound<ScalarValue>,
    /// Upper bound.
    pub high: Bound<ScalarValue>,
}

impl Range {
    /// Range matching exactly `value`.
    pub fn equal(value: impl Into<ScalarValue>) -> Self {
        let value = value.into();
        Self {
            low: Bound::Included(value.clone()),
            high: Bound::Included(value),
        }
    }

    /// Range `[low, high]`.
    pub fn between(low: impl Into<ScalarValue>, high: impl Into<ScalarValue>) -> Self {
        Self {
            low: Bound::Included(low.into()),
            high: Bound::Included(high.into()),
        }
    }

    /// Range `(value, +inf)`.
    pub fn greater_than(value: impl Into<ScalarValue>) -> Self {
        Self {
            low: Bound::Excluded(value.into()),
            high: Bound::Unbounded,
        }
    }

    /// Range `[value, +inf)`.
    pub fn greater_than_or_equal(value: impl Into<ScalarValue>) -> Self {
        Self {
            low: Bound::Included(value.into()),
            high: Bound::Unbounded,
        }
    }

    /// Range `(-inf, value)`.
    pub fn less_than(value: impl Into<ScalarValue>) -> Self {
        Self {
            low: Bound::Unbounded,
            high: Bound::Excluded(value.into()),
        }
    }

    /// Range `(-inf, value]`.
    pub fn less_than_or_equal(value: impl Into<ScalarValue>) -> Self {
        Self {
            low: Bound::Unbounded,
            high: Bound::Included(value.into()),
        }
    }

    /// Returns true when `value` lies inside the range. Incomparable values never match.
    pub fn contains(&self, value: &ScalarRef<'_>) -> bool {
        let low = match &self.low {
            Bound::Included(bound) => matches!(
                value.compare(&bound.as_ref()),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Bound::Excluded(bound) => {
                matches!(value.compare(&bound.as_ref()), Some(Ordering::Greater))
            }
            Bound::Unbounded => true,
        };
        if !low {
            return false;
        }
        match &self.high {
            Bound::Included(bound) => matches!(
                value.compare(&bound.as_ref()),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Bound::Excluded(bound) => {
                matches!(value.compare(&bound.as_ref()), Some(Ordering::Less))
            }
            Bound::Unbounded => true,
        }
    }
}

/// Declarative set of admissible values for one column, with an explicit NULL policy.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSet {
    /// Every non-null value.
    All {
        /// Whether NULL is admitted.
        null_allowed: bool,
    },
    /// No non-null value.
    None {
        /// Whether NULL is admitted.
        null_allowed: bool,
    },
    /// Discrete values, either admitted (`white_list`) or excluded.
    Equatable {
        /// The listed values.
        values: Vec<ScalarValue>,
        /// `true` admits only the listed values, `false` admits everything else.
        white_list: bool,
        /// Whether NULL is admitted.
        null_allowed: bool,
    },
    /// Union of ranges.
    Ranges {
        /// Admitted intervals.
        ranges: Vec<Range>,
        /// Whether NULL is admitted.
        null_allowed: bool,
    },
}

impl ValueSet {
    /// Admits every value including NULL.
    pub fn all() -> Self {
        ValueSet::All { null_allowed: true }
    }

    /// Admits every non-null value.
    pub fn not_null() -> Self {
        ValueSet::All {
            null_allowed: false,
        }
    }

    /// Admits only NULL.
    pub fn only_null() -> Self {
        ValueSet::None { null_allowed: true }
    }

    /// Admits nothing.
    pub fn none() -> Self {
        ValueSet::None {
            null_allowed: false,
        }
    }

    /// Admits exactly the listed values.
    pub fn of<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ScalarValue>,
    {
        ValueSet::Equatable {
            values: values.into_iter().map(Into::into).collect(),
            white_list: true,
            null_allowed: false,
        }
    }

    /// Admits every non-null value except the listed ones.
    pub fn excluding<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ScalarValue>,
    {
        ValueSet::Equatable {
            values: values.into_iter().map(Into::into).collect(),
            white_list: false,
            null_allowed: false,
        }
    }

    /// Admits values inside any of `ranges`.
    pub fn ranges(ranges: impl IntoIterator<Item = Range>) -> Self {
        ValueSet::Ranges {
            ranges: ranges.into_iter().collect(),
            null_allowed: false,
        }
    }

    /// Return a copy with the NULL policy replaced.
    pub fn with_null_allowed(mut self, allowed: bool) -> Self {
        match &mut self {
            ValueSet::All { null_allowed }
            | ValueSet::None { null_allowed }
            | ValueSet::Equatable { null_allowed, .. }
            | ValueSet::Ranges { null_allowed, .. } => *null_allowed = allowed,
        }
        self
    }

    /// Whether NULL is admitted.
    pub fn is_null_allowed(&self) -> bool {
        match self {
            ValueSet::All { null_allowed }
            | ValueSet::None { null_allowed }
            | ValueSet::Equatable { null_allowed, .. }
            | ValueSet::Ranges { null_allowed, .. } => *null_allowed,
        }
    }

    /// Returns true when `value` (`None` for NULL) is admitted.
    pub fn contains(&self, value: Option<ScalarRef<'_>>) -> bool {
        let Some(value) = value else {
            return self.is_null_allowed();
        };
        match self {
            ValueSet::All { .. } => true,
            ValueSet::None { .. } => false,
            ValueSet::Equatable {
                values, white_list, ..
            } => {
                let listed = values
                    .iter()
                    .any(|candidate| value.compare(&candidate.as_ref()) == Some(Ordering::Equal));
                listed == *white_list
            }
            ValueSet::Ranges { ranges, .. } => ranges.iter().any(|range| range.contains(&value)),
        }
    }
}
