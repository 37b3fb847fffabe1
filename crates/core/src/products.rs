//! Products

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{
    discounts::{DiscountError, DiscountPercent, apply_discount},
    money::Price,
};

/// Catalog identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a catalog identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Stock state of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Available to buy now.
    #[default]
    InStock,

    /// Not available; cannot be added to the cart.
    OutOfStock,

    /// Can be ordered ahead of stock arriving.
    PreOrder,
}

impl Availability {
    /// Whether a product with this availability may be added to a cart.
    pub fn is_purchasable(self) -> bool {
        !matches!(self, Self::OutOfStock)
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::OutOfStock => "Out of stock",
            Self::PreOrder => "Pre-order",
        }
    }
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Star rating, 1 to 5.
    pub rating: u8,

    /// Review text.
    #[serde(default)]
    pub comment: String,

    /// Display name of the reviewer.
    pub reviewer: String,
}

/// A catalog product. Read-only from the storefront's point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalog identifier
    pub id: ProductId,

    /// URL slug
    pub slug: String,

    /// Display name
    pub name: String,

    /// Long description
    pub description: String,

    /// Base price before the product discount
    pub price: Price,

    /// Product discount
    pub discount: DiscountPercent,

    /// Category tag, e.g. `biryani` or `unstitched`
    pub category: String,

    /// Stock state
    pub availability: Availability,

    /// Image references, primary first
    pub images: Vec<String>,

    /// Units in stock
    pub inventory: u32,

    /// Size options, empty when the product is not sized
    pub sizes: Vec<String>,

    /// Customer reviews
    pub reviews: Vec<Review>,

    /// Related products
    pub related: Vec<ProductId>,

    /// Free-form tags
    pub tags: Vec<String>,
}

impl Product {
    /// Create an in-stock product with no discount and empty metadata.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        let id = id.into();
        let name = name.into();

        Self {
            slug: slugify(&name),
            id,
            name,
            description: String::new(),
            price,
            discount: DiscountPercent::ZERO,
            category: String::new(),
            availability: Availability::InStock,
            images: Vec::new(),
            inventory: 0,
            sizes: Vec::new(),
            reviews: Vec::new(),
            related: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the product discount.
    #[must_use]
    pub fn with_discount(mut self, discount: DiscountPercent) -> Self {
        self.discount = discount;
        self
    }

    /// Set the stock state.
    #[must_use]
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Set the category tag.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Price after the product discount.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the discount calculation overflows.
    pub fn discounted_price(&self) -> Result<Price, DiscountError> {
        apply_discount(&self.price, self.discount)
    }

    /// Mean review rating rounded to one decimal place, `None` without reviews.
    pub fn average_rating(&self) -> Option<Decimal> {
        if self.reviews.is_empty() {
            return None;
        }

        let total: u32 = self.reviews.iter().map(|review| u32::from(review.rating)).sum();
        let count = u32::try_from(self.reviews.len()).ok()?;

        Some(
            (Decimal::from(total) / Decimal::from(count))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Primary image reference.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product may be added to a cart.
    pub fn is_purchasable(&self) -> bool {
        self.availability.is_purchasable()
    }

    /// Case-insensitive substring match on the product name. A blank query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();

        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Lowercase, dash-separated slug of a display name.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::PKR};
    use testresult::TestResult;

    use super::*;

    fn biryani() -> Product {
        Product::new("p-biryani", "Chicken Biryani", Money::from_minor(120_000, PKR))
    }

    fn review(rating: u8) -> Review {
        Review {
            rating,
            comment: String::new(),
            reviewer: "Ayesha".to_string(),
        }
    }

    #[test]
    fn new_product_derives_slug_from_name() {
        assert_eq!(biryani().slug, "chicken-biryani");
        assert_eq!(slugify("  Lawn 3-Piece (Unstitched) "), "lawn-3-piece-unstitched");
    }

    #[test]
    fn discounted_price_applies_product_discount() -> TestResult {
        let product = biryani().with_discount(DiscountPercent::from_points(25)?);

        assert_eq!(product.discounted_price()?, Money::from_minor(90_000, PKR));

        Ok(())
    }

    #[test]
    fn average_rating_is_none_without_reviews() {
        assert_eq!(biryani().average_rating(), None);
    }

    #[test]
    fn average_rating_rounds_to_one_decimal() {
        let mut product = biryani();
        product.reviews = vec![review(5), review(4), review(4)];

        assert_eq!(product.average_rating(), Some(Decimal::new(43, 1)));
    }

    #[test]
    fn matches_is_case_insensitive_substring() {
        let product = biryani();

        assert!(product.matches("biry"));
        assert!(product.matches("CHICKEN"));
        assert!(product.matches("  "));
        assert!(!product.matches("karahi"));
    }

    #[test]
    fn out_of_stock_is_not_purchasable() {
        let product = biryani().with_availability(Availability::OutOfStock);

        assert!(!product.is_purchasable());
        assert!(Availability::PreOrder.is_purchasable());
    }

    #[test]
    fn availability_uses_snake_case_on_the_wire() -> TestResult {
        assert_eq!(
            serde_json::to_string(&Availability::OutOfStock)?,
            "\"out_of_stock\""
        );

        Ok(())
    }
}
