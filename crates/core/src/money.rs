//! Money

use rusty_money::{Findable, Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};

/// An amount of money in a storefront currency.
pub type Price = Money<'static, Currency>;

/// Serialized form of a [`Price`]: an amount in minor units plus an ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyRecord {
    /// Amount in minor units (paisa, pence, cents).
    pub amount: i64,

    /// ISO 4217 alpha code.
    pub currency: String,
}

impl From<Price> for MoneyRecord {
    fn from(price: Price) -> Self {
        Self {
            amount: price.to_minor_units(),
            currency: price.currency().iso_alpha_code.to_string(),
        }
    }
}

impl TryFrom<MoneyRecord> for Price {
    type Error = MoneyError;

    fn try_from(record: MoneyRecord) -> Result<Self, Self::Error> {
        Ok(Money::from_minor(record.amount, currency(&record.currency)?))
    }
}

/// Look up an ISO currency by its alpha code, ignoring case and surrounding whitespace.
///
/// # Errors
///
/// Returns [`MoneyError::InvalidCurrency`] if the code is not a known ISO currency.
pub fn currency(code: &str) -> Result<&'static Currency, MoneyError> {
    Currency::find(&code.trim().to_ascii_uppercase()).ok_or(MoneyError::InvalidCurrency)
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Price {
    Money::from_minor(0, currency)
}

/// Serde adapter storing a [`Price`] as a [`MoneyRecord`].
pub mod price_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

    use super::{MoneyRecord, Price};

    /// Serialize a price as `{ amount, currency }`.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn serialize<S: Serializer>(price: &Price, serializer: S) -> Result<S::Ok, S::Error> {
        MoneyRecord::from(*price).serialize(serializer)
    }

    /// Deserialize a price from `{ amount, currency }`.
    ///
    /// # Errors
    ///
    /// Fails when the record is malformed or names an unknown currency.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Price, D::Error> {
        let record = MoneyRecord::deserialize(deserializer)?;

        Price::try_from(record).map_err(D::Error::custom)
    }
}
