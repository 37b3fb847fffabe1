//! Product Fixtures

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    discounts::DiscountPercent,
    fixtures::FixtureError,
    money::{self, Price},
    products::{Availability, Product, ProductId, Review, slugify},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Catalog identifier
    pub id: String,

    /// URL slug, derived from the name when omitted
    #[serde(default)]
    pub slug: Option<String>,

    /// Display name
    pub name: String,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Product price (e.g., "1200 PKR")
    pub price: String,

    /// Product discount (e.g., "10%")
    #[serde(default)]
    pub discount: Option<String>,

    /// Category tag
    #[serde(default)]
    pub category: String,

    /// Stock state
    #[serde(default)]
    pub availability: Availability,

    /// Image references
    #[serde(default)]
    pub images: Vec<String>,

    /// Units in stock
    #[serde(default)]
    pub inventory: u32,

    /// Size options
    #[serde(default)]
    pub sizes: Vec<String>,

    /// Customer reviews
    #[serde(default)]
    pub reviews: Vec<Review>,

    /// Related product identifiers
    #[serde(default)]
    pub related: Vec<String>,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let discount = fixture
            .discount
            .as_deref()
            .map(parse_discount)
            .transpose()?
            .unwrap_or_default();

        if let Some(review) = fixture
            .reviews
            .iter()
            .find(|review| !(1..=5).contains(&review.rating))
        {
            return Err(FixtureError::InvalidRating {
                product: fixture.id,
                rating: review.rating,
            });
        }

        Ok(Product {
            slug: fixture.slug.unwrap_or_else(|| slugify(&fixture.name)),
            id: ProductId::new(fixture.id),
            name: fixture.name,
            description: fixture.description,
            price: parse_price(&fixture.price)?,
            discount,
            category: fixture.category,
            availability: fixture.availability,
            images: fixture.images,
            inventory: fixture.inventory,
            sizes: fixture.sizes,
            reviews: fixture.reviews,
            related: fixture.related.into_iter().map(ProductId::new).collect(),
            tags: fixture.tags,
        })
    }
}

/// Parse a price string (e.g., "1200 PKR" or "2.99 GBP").
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is
/// not a decimal number, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<Price, FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency: &'static Currency =
        money::currency(code).map_err(|_err| FixtureError::UnknownCurrency((*code).to_string()))?;

    // Minor units per major unit for this currency.
    let scale = Decimal::from(Money::from_major(1, currency).to_minor_units());

    let minor_units = amount
        .checked_mul(scale)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .filter(|minor| *minor >= 0)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse a discount string in percent points, with or without a `%` suffix ("10%" or "10").
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPercentage`] if the value is not a number from 0 to 100.
pub fn parse_discount(s: &str) -> Result<DiscountPercent, FixtureError> {
    let trimmed = s.trim();
    let points = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    points
        .parse::<Decimal>()
        .ok()
        .and_then(|points| DiscountPercent::new(points).ok())
        .ok_or_else(|| FixtureError::InvalidPercentage(s.to_string()))
}
