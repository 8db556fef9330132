use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount represented as **integer cents**.
///
/// Every balance, split share and settlement amount in the engine is a
/// `MoneyCents`, so summing many shares never drifts the way repeated
/// floating-point addition does. Conversion to and from two-decimal major
/// units only happens at the boundary ([`MoneyCents::try_from_major`] and
/// [`fmt::Display`]). Arithmetic is checked only.
///
/// The value is signed:
/// - positive = the member is owed money
/// - negative = the member owes money
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

/// Tolerance used when checking that a major-unit float carries at most two
/// fractional digits (`0.1 * 100.0` is not exactly `10.0`).
const SUB_CENT_TOLERANCE: f64 = 1e-6;

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// Checked sum of `amounts` (returns `None` on overflow).
    pub fn checked_sum(amounts: impl IntoIterator<Item = MoneyCents>) -> Option<MoneyCents> {
        amounts
            .into_iter()
            .try_fold(MoneyCents::ZERO, MoneyCents::checked_add)
    }

    /// Converts a major-unit decimal (e.g. `10.5`) into cents.
    ///
    /// Rejects non-finite values, values with more than two fractional digits
    /// and values that do not fit in `i64` cents. The sign is preserved; callers
    /// that need a non-negative amount check it themselves so they can name the
    /// offending record.
    pub fn try_from_major(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "amount is not finite: {value}"
            )));
        }

        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > SUB_CENT_TOLERANCE {
            return Err(EngineError::InvalidAmount(format!(
                "too many decimals: {value}"
            )));
        }
        if rounded >= i64::MAX as f64 || rounded < i64::MIN as f64 {
            return Err(EngineError::InvalidAmount(format!(
                "amount too large: {value}"
            )));
        }

        Ok(MoneyCents(rounded as i64))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn from_major_rounds_float_noise() {
        assert_eq!(MoneyCents::try_from_major(0.1).unwrap().cents(), 10);
        assert_eq!(MoneyCents::try_from_major(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(MoneyCents::try_from_major(33.33).unwrap().cents(), 3333);
        assert_eq!(MoneyCents::try_from_major(-12.5).unwrap().cents(), -1250);
        assert_eq!(MoneyCents::try_from_major(-0.0).unwrap(), MoneyCents::ZERO);
    }

    #[test]
    fn from_major_rejects_non_finite_and_sub_cent() {
        assert!(matches!(
            MoneyCents::try_from_major(f64::NAN),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            MoneyCents::try_from_major(f64::INFINITY),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            MoneyCents::try_from_major(1.005),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            MoneyCents::try_from_major(1e300),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn checked_sum_adds_cents_exactly() {
        let parts = vec![MoneyCents::new(3333); 3];
        assert_eq!(MoneyCents::checked_sum(parts), Some(MoneyCents::new(9999)));
        assert_eq!(MoneyCents::checked_sum([]), Some(MoneyCents::ZERO));
    }

    #[test]
    fn checked_sum_detects_overflow() {
        let half = MoneyCents::new(i64::MAX / 2 + 10);
        assert_eq!(MoneyCents::checked_sum([half, half]), None);
        assert_eq!(
            MoneyCents::checked_sum([half, half, MoneyCents::new(-i64::MAX / 2)]),
            None
        );
    }
}
