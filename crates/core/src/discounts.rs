//! Discounts
//!
//! Per-product percentage discounts and the shared percent-of-minor-units helper used by the
//! pricing engine and promo codes.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Discount percentage outside of 0 to 100.
    #[error("discount of {0}% is outside 0-100%")]
    OutOfRange(Decimal),

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A product discount in percent points, so `10` means 10% off.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    /// No discount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// 10% off.
    pub const TEN: Self = Self(Decimal::TEN);

    /// Create a discount from percent points.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::OutOfRange`] unless `0 <= points <= 100`.
    pub fn new(points: Decimal) -> Result<Self, DiscountError> {
        if points < Decimal::ZERO || points > Decimal::ONE_HUNDRED {
            return Err(DiscountError::OutOfRange(points));
        }

        Ok(Self(points.normalize()))
    }

    /// Create a discount from whole percent points.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::OutOfRange`] when `points` is above 100.
    pub fn from_points(points: u8) -> Result<Self, DiscountError> {
        Self::new(Decimal::from(points))
    }

    /// Percent points, e.g. `10` for 10% off.
    pub fn points(self) -> Decimal {
        self.0
    }

    /// The discount as a fractional [`Percentage`] (10% off is `0.10`).
    pub fn as_percentage(self) -> Percentage {
        Percentage::from(self.0 / Decimal::ONE_HUNDRED)
    }

    /// Whether this discount takes nothing off.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for DiscountPercent {
    type Error = DiscountError;

    fn try_from(points: Decimal) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<DiscountPercent> for Decimal {
    fn from(discount: DiscountPercent) -> Self {
        discount.0
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Rounds half away from zero, so 10% of 1005 paisa is 101.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Amount taken off `price` by `discount`.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn discount_on<'a>(
    price: &Money<'a, Currency>,
    discount: DiscountPercent,
) -> Result<Money<'a, Currency>, DiscountError> {
    let off = percent_of_minor(&discount.as_percentage(), price.to_minor_units())?;

    Ok(Money::from_minor(off, price.currency()))
}

/// `price` with `discount` taken off, never below zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn apply_discount<'a>(
    price: &Money<'a, Currency>,
    discount: DiscountPercent,
) -> Result<Money<'a, Currency>, DiscountError> {
    if discount.is_zero() {
        return Ok(*price);
    }

    let off = discount_on(price, discount)?.to_minor_units();
    let minor = price.to_minor_units().saturating_sub(off).max(0);

    Ok(Money::from_minor(minor, price.currency()))
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use rusty_money::iso::PKR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let percent = Percentage::from(2.0);
        let result = percent_of_minor(&percent, i64::MAX);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));
    }

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() -> TestResult {
        let percent = Percentage::try_from("0.10")?;

        assert_eq!(percent_of_minor(&percent, 1005)?, 101);
        assert_eq!(percent_of_minor(&percent, 1004)?, 100);

        Ok(())
    }

    #[test]
    fn discount_percent_rejects_out_of_range_points() {
        assert!(matches!(
            DiscountPercent::new(Decimal::from(101)),
            Err(DiscountError::OutOfRange(_))
        ));
        assert!(matches!(
            DiscountPercent::new(Decimal::from(-1)),
            Err(DiscountError::OutOfRange(_))
        ));
    }

    #[test]
    fn discount_percent_accepts_bounds() -> TestResult {
        assert!(DiscountPercent::from_points(0)?.is_zero());
        assert_eq!(
            DiscountPercent::from_points(100)?.points(),
            Decimal::ONE_HUNDRED
        );

        Ok(())
    }

    #[test]
    fn apply_discount_takes_percentage_off() -> TestResult {
        let price = Money::from_minor(100_000, PKR);
        let discounted = apply_discount(&price, DiscountPercent::from_points(10)?)?;

        assert_eq!(discounted, Money::from_minor(90_000, PKR));

        Ok(())
    }

    #[test]
    fn apply_discount_is_identity_for_zero_and_free_for_hundred() -> TestResult {
        let price = Money::from_minor(4_550, PKR);

        assert_eq!(apply_discount(&price, DiscountPercent::ZERO)?, price);
        assert_eq!(
            apply_discount(&price, DiscountPercent::from_points(100)?)?,
            Money::from_minor(0, PKR)
        );

        Ok(())
    }

    #[test]
    fn discount_percent_deserializes_from_json_number_and_string() -> TestResult {
        let from_number: DiscountPercent = serde_json::from_str("15")?;
        let from_string: DiscountPercent = serde_json::from_str("\"12.5\"")?;

        assert_eq!(from_number, DiscountPercent::from_points(15)?);
        assert_eq!(from_string.points(), Decimal::new(125, 1));
        assert!(serde_json::from_str::<DiscountPercent>("150").is_err());

        Ok(())
    }

    #[test]
    fn display_shows_percent_points() -> TestResult {
        assert_eq!(DiscountPercent::from_points(25)?.to_string(), "25%");

        Ok(())
    }
}
