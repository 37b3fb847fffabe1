//! Cart models

use std::{collections::BTreeMap, fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

use crate::{
    discounts::DiscountPercent,
    money::{Price, price_serde},
    pricing::{PricingError, discounted_unit_price, line_total},
    products::{Product, ProductId},
};

/// Options chosen when adding a product: a size and free-form customizations such as
/// stitching measurements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOptions {
    /// Chosen size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Customization name to value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub customizations: BTreeMap<String, String>,
}

impl SelectedOptions {
    /// Options with only a size.
    pub fn sized(size: impl Into<String>) -> Self {
        Self {
            size: Some(size.into()),
            customizations: BTreeMap::new(),
        }
    }

    /// Add a customization.
    #[must_use]
    pub fn customize(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.customizations.insert(name.into(), value.into());
        self
    }

    /// Whether nothing was chosen.
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.customizations.is_empty()
    }
}

/// Identity of a cart line: the product plus the selected options.
///
/// Built deterministically, so adding the same product with the same options always lands on
/// the same line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Line identity for `product` with `options`.
    ///
    /// The size is written as `|size:<value>` and each customization as `|<name>=<value>`.
    /// Separator characters inside the parts are percent-escaped, so distinct option sets
    /// never share an identity.
    pub fn new(product: &ProductId, options: &SelectedOptions) -> Self {
        let mut id = String::with_capacity(product.as_str().len());
        push_escaped(&mut id, product.as_str());

        if let Some(size) = &options.size {
            id.push_str("|size:");
            push_escaped(&mut id, size);
        }

        for (name, value) in &options.customizations {
            id.push('|');
            push_escaped(&mut id, name);
            id.push('=');
            push_escaped(&mut id, value);
        }

        Self(id)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn push_escaped(id: &mut String, part: &str) {
    for ch in part.chars() {
        match ch {
            '%' => id.push_str("%25"),
            '|' => id.push_str("%7C"),
            ':' => id.push_str("%3A"),
            '=' => id.push_str("%3D"),
            _ => id.push(ch),
        }
    }
}

impl From<&str> for LineId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line in the cart.
///
/// Name, image, price and discount are captured from the product when it is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product reference
    pub product: ProductId,

    /// Display name at the time of adding
    pub name: String,

    /// Primary image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Base unit price
    #[serde(with = "price_serde")]
    pub unit_price: Price,

    /// Product discount
    #[serde(default)]
    pub discount: DiscountPercent,

    /// Quantity, never zero
    pub quantity: NonZeroU32,

    /// Chosen options
    #[serde(default)]
    pub options: SelectedOptions,
}

impl CartItem {
    /// Capture `product` as a cart line.
    pub fn from_product(product: &Product, quantity: NonZeroU32, options: SelectedOptions) -> Self {
        Self {
            product: product.id.clone(),
            name: product.name.clone(),
            image: product.primary_image().map(str::to_string),
            unit_price: product.price,
            discount: product.discount,
            quantity,
            options,
        }
    }

    /// Identity of this line.
    pub fn line_id(&self) -> LineId {
        LineId::new(&self.product, &self.options)
    }

    /// Unit price after the product discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount calculation overflows.
    pub fn discounted_unit_price(&self) -> Result<Price, PricingError> {
        discounted_unit_price(&self.unit_price, self.discount)
    }

    /// Discounted unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the calculation overflows.
    pub fn line_total(&self) -> Result<Price, PricingError> {
        line_total(&self.unit_price, self.discount, self.quantity)
    }
}
