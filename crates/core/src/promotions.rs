//! Promotions
//!
//! The storefront's promo code and the spend-based rewards shown on the cart page.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    discounts::{DiscountError, DiscountPercent, discount_on},
    money::Price,
};

/// Code of the storefront's standard coupon.
pub const STANDARD_COUPON_CODE: &str = "DISCOUNT10";

/// Why a promo code was not applied.
#[derive(Debug, Error, PartialEq)]
pub enum PromoError {
    /// The code does not match any coupon.
    #[error("invalid promo code")]
    InvalidCode,

    /// The code is valid but the subtotal is below the coupon minimum.
    #[error("promo code requires a minimum order of {minimum}")]
    ThresholdNotMet {
        /// Smallest subtotal the coupon accepts
        minimum: Price,
    },

    /// Calculating the coupon discount failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// A percentage-off coupon with a minimum subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    code: String,
    rate: DiscountPercent,
    minimum_subtotal: Price,
}

impl Coupon {
    /// Create a coupon. The code is stored trimmed and uppercased.
    pub fn new(code: &str, rate: DiscountPercent, minimum_subtotal: Price) -> Self {
        Self {
            code: code.trim().to_ascii_uppercase(),
            rate,
            minimum_subtotal,
        }
    }

    /// `DISCOUNT10`: 10% off orders of at least 20,000 in `currency`.
    pub fn standard(currency: &'static Currency) -> Self {
        Self::new(
            STANDARD_COUPON_CODE,
            DiscountPercent::TEN,
            Money::from_major(20_000, currency),
        )
    }

    /// Coupon code, uppercased.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Percentage taken off the subtotal.
    pub fn rate(&self) -> DiscountPercent {
        self.rate
    }

    /// Smallest subtotal the coupon accepts.
    pub fn minimum_subtotal(&self) -> Price {
        self.minimum_subtotal
    }

    /// Whether `code` names this coupon, ignoring case and surrounding whitespace.
    pub fn matches(&self, code: &str) -> bool {
        code.trim().eq_ignore_ascii_case(&self.code)
    }

    /// Whether `subtotal` reaches the coupon minimum.
    pub fn is_eligible(&self, subtotal: &Price) -> bool {
        subtotal.to_minor_units() >= self.minimum_subtotal.to_minor_units()
    }

    /// Discount granted by entering `code` against `subtotal`.
    ///
    /// The threshold is checked before the code: below the minimum every code reports
    /// [`PromoError::ThresholdNotMet`].
    ///
    /// # Errors
    ///
    /// - [`PromoError::ThresholdNotMet`]: `subtotal` is below the minimum.
    /// - [`PromoError::InvalidCode`]: `code` is not this coupon.
    /// - [`PromoError::Discount`]: the discount calculation overflowed.
    pub fn redeem(&self, code: &str, subtotal: &Price) -> Result<Price, PromoError> {
        if !self.is_eligible(subtotal) {
            return Err(PromoError::ThresholdNotMet {
                minimum: self.minimum_subtotal,
            });
        }

        if !self.matches(code) {
            return Err(PromoError::InvalidCode);
        }

        Ok(discount_on(subtotal, self.rate)?)
    }
}

/// Spend-based rewards for a subtotal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rewards {
    /// The order qualifies for a free gift.
    pub free_gift: bool,

    /// The order is large enough for the coupon, whether or not one was entered.
    pub coupon_eligible: bool,

    /// How much more must be spent to reach the free gift, zero once reached.
    pub amount_to_free_gift: Price,

    /// How much more must be spent to earn the coupon, zero once reached.
    pub amount_to_coupon: Price,
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::PKR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn standard_coupon_takes_ten_percent_at_threshold() -> TestResult {
        let coupon = Coupon::standard(PKR);

        assert_eq!(
            coupon.redeem("DISCOUNT10", &Money::from_major(25_000, PKR))?,
            Money::from_major(2_500, PKR)
        );
        assert_eq!(
            coupon.redeem("DISCOUNT10", &Money::from_major(20_000, PKR))?,
            Money::from_major(2_000, PKR)
        );

        Ok(())
    }

    #[test]
    fn code_is_matched_case_insensitively_after_trimming() -> TestResult {
        let coupon = Coupon::standard(PKR);
        let subtotal = Money::from_major(30_000, PKR);

        assert_eq!(
            coupon.redeem("  discount10 ", &subtotal)?,
            coupon.redeem("DISCOUNT10", &subtotal)?
        );

        Ok(())
    }

    #[test]
    fn below_threshold_reports_minimum() {
        let coupon = Coupon::standard(PKR);
        let result = coupon.redeem("DISCOUNT10", &Money::from_major(10_000, PKR));

        assert_eq!(
            result,
            Err(PromoError::ThresholdNotMet {
                minimum: Money::from_major(20_000, PKR)
            })
        );
    }

    #[test]
    fn unknown_code_is_invalid_once_eligible() {
        let coupon = Coupon::standard(PKR);

        assert_eq!(
            coupon.redeem("SAVE50", &Money::from_major(50_000, PKR)),
            Err(PromoError::InvalidCode)
        );
        assert_eq!(
            coupon.redeem("", &Money::from_major(20_000, PKR)),
            Err(PromoError::InvalidCode)
        );
    }

    #[test]
    fn threshold_is_reported_before_code() {
        let coupon = Coupon::standard(PKR);
        let minimum = Money::from_major(20_000, PKR);

        assert_eq!(
            coupon.redeem("SAVE50", &Money::from_major(10_000, PKR)),
            Err(PromoError::ThresholdNotMet { minimum })
        );
        assert_eq!(
            coupon.redeem("", &Money::from_major(100, PKR)),
            Err(PromoError::ThresholdNotMet { minimum })
        );
    }
}
