use std::{cmp::Ordering, fmt};

/// Exact decimal value: `unscaled * 10^-scale`.
///
/// Extractors hand decimals to the writer in whatever scale the source
/// produced; the `Decimal128` column rescales them on store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    /// Unscaled integer value.
    pub unscaled: i128,
    /// Number of digits after the decimal point.
    pub scale: i8,
}

impl Decimal {
    /// Create a decimal from its unscaled value and scale.
    pub const fn new(unscaled: i128, scale: i8) -> Self {
        Self { unscaled, scale }
    }

    /// Return the unscaled value at `scale`, rounding half away from zero when digits are dropped.
    ///
    /// Returns `None` when scaling up overflows `i128`.
    pub fn rescale(&self, scale: i8) -> Option<i128> {
        let diff = i32::from(scale) - i32::from(self.scale);
        match diff.cmp(&0) {
            Ordering::Equal => Some(self.unscaled),
            Ordering::Greater => pow10(diff as u32)?.checked_mul(self.unscaled),
            Ordering::Less => {
                let Some(divisor) = pow10(diff.unsigned_abs()) else {
                    // |i128::MAX| < 10^39 / 2, every value rounds to zero.
                    return Some(0);
                };
                let quotient = self.unscaled / divisor;
                let remainder = (self.unscaled % divisor).unsigned_abs();
                if remainder >= divisor.unsigned_abs() - remainder {
                    Some(quotient + self.unscaled.signum())
                } else {
                    Some(quotient)
                }
            }
        }
    }

    /// Lossy conversion used when comparing against floating point values.
    pub fn to_f64(&self) -> f64 {
        self.unscaled as f64 / 10f64.powi(i32::from(self.scale))
    }

    /// Numeric comparison across scales.
    pub fn compare(&self, other: &Decimal) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (self.rescale(scale), other.rescale(scale)) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            _ => self.to_f64().total_cmp(&other.to_f64()),
        }
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(i128::from(value), 0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale <= 0 {
            let zeros = "0".repeat(self.scale.unsigned_abs() as usize);
            return write!(f, "{}{}", self.unscaled, zeros);
        }
        let scale = self.scale as usize;
        let digits = self.unscaled.unsigned_abs().to_string();
        let sign = if self.unscaled < 0 { "-" } else { "" };
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{int}.{frac}")
        } else {
            write!(f, "{sign}0.{digits:0>scale$}")
        }
    }
}

fn pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}
