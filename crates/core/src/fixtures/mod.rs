//! Fixtures
//!
//! YAML catalog files that seed the local catalog provider.

use std::{fs, path::Path};

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{fixtures::products::CatalogFixture, products::Product};

pub mod products;

pub use products::{parse_discount, parse_price};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Review rating outside 1 to 5
    #[error("Product {product} has a review rated {rating}; ratings are 1-5")]
    InvalidRating {
        /// Product identifier
        product: String,
        /// Offending rating
        rating: u8,
    },

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products share an identifier or slug
    #[error("Duplicate product identifier or slug: {0}")]
    DuplicateProduct(String),
}

/// Parse a YAML catalog. Every product must share one currency and have a unique identifier
/// and slug.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the YAML is malformed or a product is invalid.
pub fn parse_catalog(yaml: &str) -> Result<Vec<Product>, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

    let products = fixture
        .products
        .into_iter()
        .map(Product::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let mut ids = FxHashSet::default();
    let mut slugs = FxHashSet::default();
    let currency = products.first().map(|product| product.price.currency());

    for product in &products {
        if let Some(expected) = currency {
            let actual = product.price.currency();

            if actual != expected {
                return Err(FixtureError::CurrencyMismatch(
                    expected.iso_alpha_code.to_string(),
                    actual.iso_alpha_code.to_string(),
                ));
            }
        }

        if !ids.insert(product.id.as_str()) {
            return Err(FixtureError::DuplicateProduct(product.id.to_string()));
        }

        if !slugs.insert(product.slug.as_str()) {
            return Err(FixtureError::DuplicateProduct(product.slug.clone()));
        }
    }

    Ok(products)
}

/// Load a YAML catalog file.
///
/// # Errors
///
/// Returns [`FixtureError::Io`] if the file cannot be read, otherwise as [`parse_catalog`].
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Product>, FixtureError> {
    parse_catalog(&fs::read_to_string(path)?)
}
