//! Pricing
//!
//! Cart subtotals, shipping tiers, promo discounts and order totals. Everything here is pure
//! arithmetic on minor units; nothing is stored.

use std::num::NonZeroU32;

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::CartItem,
    discounts::{DiscountError, DiscountPercent, apply_discount},
    money::{Price, zero},
    promotions::{Coupon, PromoError, Rewards},
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line total does not fit in minor units.
    #[error("line total overflowed")]
    Overflow,

    /// Wrapped discount calculation error.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// `price` less `discount`, rounded to the minor unit and never negative.
///
/// # Errors
///
/// Returns [`PricingError::Discount`] if the discount calculation overflows.
pub fn discounted_unit_price(
    price: &Price,
    discount: DiscountPercent,
) -> Result<Price, PricingError> {
    Ok(apply_discount(price, discount)?)
}

/// Discounted unit price times quantity.
///
/// # Errors
///
/// - [`PricingError::Discount`]: the discount calculation overflowed.
/// - [`PricingError::Overflow`]: the line total does not fit in minor units.
pub fn line_total(
    unit_price: &Price,
    discount: DiscountPercent,
    quantity: NonZeroU32,
) -> Result<Price, PricingError> {
    let unit = discounted_unit_price(unit_price, discount)?;
    let minor = unit
        .to_minor_units()
        .checked_mul(i64::from(quantity.get()))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit.currency()))
}

/// Sum of line totals. An empty cart is zero in `currency`.
///
/// # Errors
///
/// - [`PricingError::Money`]: a line is priced in a different currency.
/// - [`PricingError::Discount`] or [`PricingError::Overflow`]: arithmetic overflowed.
pub fn subtotal(items: &[CartItem], currency: &'static Currency) -> Result<Price, PricingError> {
    items.iter().try_fold(zero(currency), |acc, item| {
        Ok(acc.add(item.line_total()?)?)
    })
}

/// `subtotal + shipping - discount`, floored at zero.
///
/// # Errors
///
/// Returns [`PricingError::Money`] if the amounts are in different currencies.
pub fn total(subtotal: Price, shipping: Price, discount: Price) -> Result<Price, PricingError> {
    let net = subtotal.add(shipping)?.sub(discount)?;

    if net.to_minor_units() < 0 {
        return Ok(zero(net.currency()));
    }

    Ok(net)
}

/// Shipping fee tiers keyed on the subtotal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShippingTiers {
    /// Subtotals at or above this ship free
    pub free_from: Price,

    /// Subtotals at or above this pay `reduced_fee`
    pub reduced_from: Price,

    /// Fee for the middle tier
    pub reduced_fee: Price,

    /// Fee below `reduced_from`
    pub base_fee: Price,
}

impl ShippingTiers {
    /// Free from 30,000; 600 from 7,000; 250 otherwise.
    pub fn standard(currency: &'static Currency) -> Self {
        Self {
            free_from: Money::from_major(30_000, currency),
            reduced_from: Money::from_major(7_000, currency),
            reduced_fee: Money::from_major(600, currency),
            base_fee: Money::from_major(250, currency),
        }
    }

    /// Fee for `subtotal`.
    pub fn fee_for(&self, subtotal: &Price) -> Price {
        let minor = subtotal.to_minor_units();

        if minor >= self.free_from.to_minor_units() {
            zero(self.free_from.currency())
        } else if minor >= self.reduced_from.to_minor_units() {
            self.reduced_fee
        } else {
            self.base_fee
        }
    }
}

/// Configuration of the pricing engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRules {
    /// Currency every amount is in
    pub currency: &'static Currency,

    /// Shipping tiers
    pub shipping: ShippingTiers,

    /// Subtotal from which a free gift is included
    pub free_gift_from: Price,

    /// The promo code coupon
    pub coupon: Coupon,
}

impl PricingRules {
    /// The storefront defaults: standard shipping tiers, a free gift from 15,000 and
    /// `DISCOUNT10`.
    pub fn standard(currency: &'static Currency) -> Self {
        Self {
            currency,
            shipping: ShippingTiers::standard(currency),
            free_gift_from: Money::from_major(15_000, currency),
            coupon: Coupon::standard(currency),
        }
    }
}

/// What happened to the promo code of a quote.
#[derive(Debug, PartialEq)]
pub enum PromoOutcome {
    /// No code was entered.
    NotRequested,

    /// The code was accepted.
    Applied {
        /// Normalized code
        code: String,
        /// Amount taken off
        discount: Price,
    },

    /// The code was rejected; the quote carries no discount.
    Rejected(PromoError),
}

/// Everything the cart and checkout pages show about a cart's price.
#[derive(Debug, PartialEq)]
pub struct Quote {
    /// Sum of discounted line totals
    pub subtotal: Price,

    /// Shipping fee for the subtotal
    pub shipping: Price,

    /// Promo discount, zero unless a code was applied
    pub discount: Price,

    /// Amount payable
    pub total: Price,

    /// Spend-based rewards
    pub rewards: Rewards,

    /// Promo code result
    pub promo: PromoOutcome,
}

impl Quote {
    /// Code of the applied promo, if any.
    pub fn applied_code(&self) -> Option<&str> {
        match &self.promo {
            PromoOutcome::Applied { code, .. } => Some(code),
            PromoOutcome::NotRequested | PromoOutcome::Rejected(_) => None,
        }
    }
}

/// Prices carts according to a set of [`PricingRules`].
#[derive(Debug, Clone, PartialEq)]
pub struct PricingEngine {
    rules: PricingRules,
}

impl PricingEngine {
    /// Create an engine from rules.
    pub fn new(rules: PricingRules) -> Self {
        Self { rules }
    }

    /// Engine with [`PricingRules::standard`].
    pub fn standard(currency: &'static Currency) -> Self {
        Self::new(PricingRules::standard(currency))
    }

    /// Rules in use.
    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Engine currency.
    pub fn currency(&self) -> &'static Currency {
        self.rules.currency
    }

    /// Sum of discounted line totals.
    ///
    /// # Errors
    ///
    /// See [`subtotal`].
    pub fn subtotal(&self, items: &[CartItem]) -> Result<Price, PricingError> {
        subtotal(items, self.rules.currency)
    }

    /// Shipping fee for `subtotal`.
    pub fn shipping(&self, subtotal: &Price) -> Price {
        self.rules.shipping.fee_for(subtotal)
    }

    /// Discount granted by `code` against `subtotal`.
    ///
    /// # Errors
    ///
    /// See [`Coupon::redeem`].
    pub fn apply_promo_code(&self, code: &str, subtotal: &Price) -> Result<Price, PromoError> {
        self.rules.coupon.redeem(code, subtotal)
    }

    /// Rewards unlocked by `subtotal`.
    pub fn rewards(&self, subtotal: &Price) -> Rewards {
        Rewards {
            free_gift: subtotal.to_minor_units() >= self.rules.free_gift_from.to_minor_units(),
            coupon_eligible: self.rules.coupon.is_eligible(subtotal),
            amount_to_free_gift: self.amount_to_free_gift(subtotal),
            amount_to_coupon: self.remaining(&self.rules.coupon.minimum_subtotal(), subtotal),
        }
    }

    /// How much more must be spent to reach the free gift.
    pub fn amount_to_free_gift(&self, subtotal: &Price) -> Price {
        self.remaining(&self.rules.free_gift_from, subtotal)
    }

    fn remaining(&self, threshold: &Price, subtotal: &Price) -> Price {
        let remaining = threshold
            .to_minor_units()
            .saturating_sub(subtotal.to_minor_units())
            .max(0);

        Money::from_minor(remaining, self.rules.currency)
    }

    /// Price `items` with an optional promo code. A blank code counts as none, and a rejected
    /// code contributes no discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the items cannot be summed or the promo calculation
    /// overflows.
    pub fn quote(&self, items: &[CartItem], promo_code: Option<&str>) -> Result<Quote, PricingError> {
        let subtotal = self.subtotal(items)?;
        let shipping = self.shipping(&subtotal);

        let promo = match promo_code.map(str::trim).filter(|code| !code.is_empty()) {
            None => PromoOutcome::NotRequested,
            Some(code) => match self.apply_promo_code(code, &subtotal) {
                Ok(discount) => PromoOutcome::Applied {
                    code: self.rules.coupon.code().to_string(),
                    discount,
                },
                Err(PromoError::Discount(err)) => return Err(err.into()),
                Err(rejection) => PromoOutcome::Rejected(rejection),
            },
        };

        let discount = match &promo {
            PromoOutcome::Applied { discount, .. } => *discount,
            PromoOutcome::NotRequested | PromoOutcome::Rejected(_) => zero(self.rules.currency),
        };

        Ok(Quote {
            subtotal,
            shipping,
            discount,
            total: total(subtotal, shipping, discount)?,
            rewards: self.rewards(&subtotal),
            promo,
        })
    }
}
