use std::{
    fmt,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

/// Money amount represented as **integer minor units** (cents).
///
/// Use this type for **all** monetary values in the engine (incomes,
/// purchase amounts, tax figures) to avoid floating-point drift. It
/// serializes as a plain integer.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Applies a rate expressed in basis points (1 bp = 0.01%).
    ///
    /// The intermediate product is computed in `i128`, so scaling cannot
    /// overflow for any `i64` amount. The result is truncated toward zero,
    /// which equals floor for the non-negative amounts the engine handles.
    ///
    /// ```rust
    /// use engine::Money;
    ///
    /// // 20% of 5500.00
    /// assert_eq!(Money::new(550_000).scale_bp(2000), Money::new(110_000));
    /// ```
    #[must_use]
    pub fn scale_bp(self, bp: u32) -> Money {
        let scaled = i128::from(self.0) * i128::from(bp) / 10_000;
        Money(scaled as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_minor_units() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn scale_bp_truncates_toward_zero() {
        assert_eq!(Money::new(30_000).scale_bp(500), Money::new(1_500));
        // 5% of 0.01 is a fraction of a cent.
        assert_eq!(Money::new(1).scale_bp(500), Money::ZERO);
        assert_eq!(Money::new(999).scale_bp(500), Money::new(49));
    }

    #[test]
    fn scale_bp_handles_large_amounts() {
        assert_eq!(
            Money::new(i64::MAX).scale_bp(10_000),
            Money::new(i64::MAX)
        );
    }
}
