//! Dynamic scalar values used by type-agnostic constraints.
//!
//! NULL is never a scalar: an absent value is `Option::None` at every API
//! boundary so that constraints see "null-or-value", not "value-or-default".

use std::cmp::Ordering;

use crate::decimal::Decimal;

/// Owned scalar literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// Boolean literal.
    Boolean(bool),
    /// 8-bit signed integer.
    Int8(i8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// Days since the UNIX epoch.
    Date32(i32),
    /// Milliseconds since the UNIX epoch.
    Date64(i64),
    /// Exact decimal.
    Decimal(Decimal),
    /// UTF-8 string.
    Utf8(String),
    /// Raw bytes.
    Binary(Vec<u8>),
}

/// Borrowed scalar view handed to constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    /// Boolean value.
    Boolean(bool),
    /// 8-bit signed integer.
    Int8(i8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// Days since the UNIX epoch.
    Date32(i32),
    /// Milliseconds since the UNIX epoch.
    Date64(i64),
    /// Exact decimal.
    Decimal(Decimal),
    /// UTF-8 string.
    Utf8(&'a str),
    /// Raw bytes.
    Binary(&'a [u8]),
}

const MILLIS_PER_DAY: i64 = 86_400_000;

enum Numeric {
    Int(i64),
    Float(f64),
    Decimal(Decimal),
}

impl ScalarValue {
    /// Borrow this literal as a [`ScalarRef`].
    pub fn as_ref(&self) -> ScalarRef<'_> {
        match self {
            ScalarValue::Boolean(v) => ScalarRef::Boolean(*v),
            ScalarValue::Int8(v) => ScalarRef::Int8(*v),
            ScalarValue::Int16(v) => ScalarRef::Int16(*v),
            ScalarValue::Int32(v) => ScalarRef::Int32(*v),
            ScalarValue::Int64(v) => ScalarRef::Int64(*v),
            ScalarValue::Float32(v) => ScalarRef::Float32(*v),
            ScalarValue::Float64(v) => ScalarRef::Float64(*v),
            ScalarValue::Date32(v) => ScalarRef::Date32(*v),
            ScalarValue::Date64(v) => ScalarRef::Date64(*v),
            ScalarValue::Decimal(v) => ScalarRef::Decimal(*v),
            ScalarValue::Utf8(v) => ScalarRef::Utf8(v),
            ScalarValue::Binary(v) => ScalarRef::Binary(v),
        }
    }
}

impl<'a> ScalarRef<'a> {
    /// Copy into an owned literal.
    pub fn to_value(&self) -> ScalarValue {
        match *self {
            ScalarRef::Boolean(v) => ScalarValue::Boolean(v),
            ScalarRef::Int8(v) => ScalarValue::Int8(v),
            ScalarRef::Int16(v) => ScalarValue::Int16(v),
            ScalarRef::Int32(v) => ScalarValue::Int32(v),
            ScalarRef::Int64(v) => ScalarValue::Int64(v),
            ScalarRef::Float32(v) => ScalarValue::Float32(v),
            ScalarRef::Float64(v) => ScalarValue::Float64(v),
            ScalarRef::Date32(v) => ScalarValue::Date32(v),
            ScalarRef::Date64(v) => ScalarValue::Date64(v),
            ScalarRef::Decimal(v) => ScalarValue::Decimal(v),
            ScalarRef::Utf8(v) => ScalarValue::Utf8(v.to_owned()),
            ScalarRef::Binary(v) => ScalarValue::Binary(v.to_vec()),
        }
    }

    /// Compare two scalars of compatible kinds.
    ///
    /// Integers, floats and decimals compare numerically with each other;
    /// `Date32` and `Date64` compare on the millisecond timeline. Returns
    /// `None` for incompatible kinds and for NaN.
    pub fn compare(&self, other: &ScalarRef<'_>) -> Option<Ordering> {
        match (self, other) {
            (ScalarRef::Boolean(l), ScalarRef::Boolean(r)) => Some(l.cmp(r)),
            (ScalarRef::Utf8(l), ScalarRef::Utf8(r)) => Some(l.cmp(r)),
            (ScalarRef::Binary(l), ScalarRef::Binary(r)) => Some(l.cmp(r)),
            (ScalarRef::Date32(l), ScalarRef::Date32(r)) => Some(l.cmp(r)),
            (ScalarRef::Date64(l), ScalarRef::Date64(r)) => Some(l.cmp(r)),
            (ScalarRef::Date32(l), ScalarRef::Date64(r)) => {
                Some((i64::from(*l) * MILLIS_PER_DAY).cmp(r))
            }
            (ScalarRef::Date64(l), ScalarRef::Date32(r)) => {
                Some(l.cmp(&(i64::from(*r) * MILLIS_PER_DAY)))
            }
            _ => match (self.numeric()?, other.numeric()?) {
                (Numeric::Int(l), Numeric::Int(r)) => Some(l.cmp(&r)),
                (Numeric::Decimal(l), Numeric::Decimal(r)) => Some(l.compare(&r)),
                (Numeric::Int(l), Numeric::Decimal(r)) => Some(Decimal::from(l).compare(&r)),
                (Numeric::Decimal(l), Numeric::Int(r)) => Some(l.compare(&Decimal::from(r))),
                (Numeric::Int(l), Numeric::Float(r)) => compare_int_float(l, r),
                (Numeric::Float(l), Numeric::Int(r)) => {
                    compare_int_float(r, l).map(Ordering::reverse)
                }
                (l, r) => l.as_f64().partial_cmp(&r.as_f64()),
            },
        }
    }

    fn numeric(&self) -> Option<Numeric> {
        match *self {
            ScalarRef::Int8(v) => Some(Numeric::Int(i64::from(v))),
            ScalarRef::Int16(v) => Some(Numeric::Int(i64::from(v))),
            ScalarRef::Int32(v) => Some(Numeric::Int(i64::from(v))),
            ScalarRef::Int64(v) => Some(Numeric::Int(v)),
            ScalarRef::Float32(v) => Some(Numeric::Float(f64::from(v))),
            ScalarRef::Float64(v) => Some(Numeric::Float(v)),
            ScalarRef::Decimal(v) => Some(Numeric::Decimal(v)),
            _ => None,
        }
    }
}

/// Exact comparison of an integer with a float; `None` for NaN.
fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, exactly representable.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if float.is_nan() {
        return None;
    }
    if float >= LIMIT {
        return Some(Ordering::Less);
    }
    if float < -LIMIT {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&float),
        ordering => Some(ordering),
    }
}

impl Numeric {
    fn as_f64(&self) -> f64 {
        match self {
            Numeric::Int(v) => *v as f64,
            Numeric::Float(v) => *v,
            Numeric::Decimal(v) => v.to_f64(),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ScalarValue {
                fn from(value: $ty) -> Self {
                    ScalarValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Boolean,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
    String => Utf8,
    Vec<u8> => Binary,
);

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(value.to_owned())
    }
}

impl From<&[u8]> for ScalarValue {
    fn from(value: &[u8]) -> Self {
        ScalarValue::Binary(value.to_vec())
    }
}
