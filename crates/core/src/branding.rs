//! Branding
//!
//! One storefront code path serves several product lines. A [`Brand`] carries everything that
//! differs between them: name, copy, colour tokens, currency and default country.

use std::{fs, io, path::Path};

use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money;

/// Errors building or loading a brand.
#[derive(Debug, Error)]
pub enum BrandError {
    /// The brand has no name.
    #[error("brand name is required")]
    MissingName,

    /// A colour token is not `#rrggbb`.
    #[error("colour `{token}` must be #rrggbb, got `{value}`")]
    InvalidColor {
        /// Token name
        token: &'static str,
        /// Offending value
        value: String,
    },

    /// The currency code is not a known ISO currency.
    #[error("unknown currency `{0}`")]
    UnknownCurrency(String),

    /// Reading a brand file failed.
    #[error("failed to read brand file: {0}")]
    Io(#[from] io::Error),

    /// A brand file is not valid YAML for a brand.
    #[error("failed to parse brand YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Colour tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    /// Main brand colour
    pub primary: String,

    /// Highlight colour
    pub accent: String,
}

/// Brand configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Display name
    pub name: String,

    /// One-line pitch
    #[serde(default)]
    pub tagline: String,

    /// Colour tokens
    pub colors: BrandColors,

    /// ISO currency code prices are in
    pub currency: String,

    /// Country preset on the checkout form
    pub default_country: String,

    /// Closing line of order documents
    #[serde(default)]
    pub sign_off: String,
}

impl Brand {
    /// Start building a brand.
    pub fn builder(name: impl Into<String>) -> BrandBuilder {
        BrandBuilder::new(name)
    }

    /// MA Foods: ready-to-eat meals.
    pub fn ma_foods() -> Self {
        Self {
            name: "MA Foods".to_string(),
            tagline: "Home-style meals, delivered fresh".to_string(),
            colors: BrandColors {
                primary: "#11142D".to_string(),
                accent: "#FBBF24".to_string(),
            },
            currency: "PKR".to_string(),
            default_country: "Pakistan".to_string(),
            sign_off: "Thank you for ordering with MA Foods. Enjoy your meal!".to_string(),
        }
    }

    /// MA Tailor: ready-to-wear, unstitched and custom stitched clothing.
    pub fn ma_tailor() -> Self {
        Self {
            name: "MA Tailor".to_string(),
            tagline: "Ready-to-wear, unstitched and made to measure".to_string(),
            colors: BrandColors {
                primary: "#101820".to_string(),
                accent: "#ED9B33".to_string(),
            },
            currency: "PKR".to_string(),
            default_country: "Pakistan".to_string(),
            sign_off: "Thank you for shopping with MA Tailor.".to_string(),
        }
    }

    /// Parse and validate a brand from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`BrandError::Yaml`] for malformed YAML, or a validation error.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, BrandError> {
        let brand: Self = serde_norway::from_str(yaml)?;

        brand.validate()?;

        Ok(brand)
    }

    /// Load and validate a brand YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`BrandError::Io`] if the file cannot be read, otherwise as
    /// [`Brand::from_yaml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BrandError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// The brand currency.
    ///
    /// # Errors
    ///
    /// Returns [`BrandError::UnknownCurrency`] if the code is not an ISO currency.
    pub fn currency(&self) -> Result<&'static Currency, BrandError> {
        money::currency(&self.currency)
            .ok()
            .ok_or_else(|| BrandError::UnknownCurrency(self.currency.clone()))
    }

    fn validate(&self) -> Result<(), BrandError> {
        if self.name.trim().is_empty() {
            return Err(BrandError::MissingName);
        }

        validate_color("primary", &self.colors.primary)?;
        validate_color("accent", &self.colors.accent)?;

        self.currency()?;

        Ok(())
    }
}

fn validate_color(token: &'static str, value: &str) -> Result<(), BrandError> {
    let valid = value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()));

    if valid {
        Ok(())
    } else {
        Err(BrandError::InvalidColor {
            token,
            value: value.to_string(),
        })
    }
}

/// Builder for [`Brand`], starting from neutral defaults in PKR.
#[derive(Debug, Clone)]
pub struct BrandBuilder {
    brand: Brand,
}

impl BrandBuilder {
    /// Start a brand called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            brand: Brand {
                name: name.into(),
                tagline: String::new(),
                colors: BrandColors {
                    primary: "#000000".to_string(),
                    accent: "#FFFFFF".to_string(),
                },
                currency: "PKR".to_string(),
                default_country: "Pakistan".to_string(),
                sign_off: String::new(),
            },
        }
    }

    /// Set the tagline.
    #[must_use]
    pub fn tagline(mut self, tagline: impl Into<String>) -> Self {
        self.brand.tagline = tagline.into();
        self
    }

    /// Set the primary colour, `#rrggbb`.
    #[must_use]
    pub fn primary_color(mut self, color: impl Into<String>) -> Self {
        self.brand.colors.primary = color.into();
        self
    }

    /// Set the accent colour, `#rrggbb`.
    #[must_use]
    pub fn accent_color(mut self, color: impl Into<String>) -> Self {
        self.brand.colors.accent = color.into();
        self
    }

    /// Set the ISO currency code.
    #[must_use]
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.brand.currency = code.into();
        self
    }

    /// Set the checkout country preset.
    #[must_use]
    pub fn default_country(mut self, country: impl Into<String>) -> Self {
        self.brand.default_country = country.into();
        self
    }

    /// Set the closing line of order documents.
    #[must_use]
    pub fn sign_off(mut self, sign_off: impl Into<String>) -> Self {
        self.brand.sign_off = sign_off.into();
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns a [`BrandError`] for a blank name, a malformed colour or an unknown currency.
    pub fn build(self) -> Result<Brand, BrandError> {
        self.brand.validate()?;

        Ok(self.brand)
    }
}
