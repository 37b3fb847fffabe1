//! Orders

use std::{fmt, num::NonZeroU32, str::FromStr};

use jiff::Timestamp;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartItem,
    discounts::DiscountPercent,
    money::{Price, price_serde},
    pricing::{PricingError, Quote, discounted_unit_price, line_total},
    products::ProductId,
};

/// Errors parsing order values from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderParseError {
    /// Order numbers are non-empty ASCII letters, digits and dashes.
    #[error("invalid order number `{0}`")]
    InvalidNumber(String),

    /// Unknown payment method.
    #[error("unknown payment method `{0}`")]
    UnknownPaymentMethod(String),
}

/// Order number assigned by the orders service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Validate and wrap an order number.
    ///
    /// # Errors
    ///
    /// Returns [`OrderParseError::InvalidNumber`] unless the number is non-empty ASCII letters,
    /// digits and dashes.
    pub fn new(number: impl Into<String>) -> Result<Self, OrderParseError> {
        let number = number.into();
        let valid = !number.is_empty()
            && number
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');

        if valid {
            Ok(Self(number))
        } else {
            Err(OrderParseError::InvalidNumber(number))
        }
    }

    /// The number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = OrderParseError;

    fn try_from(number: String) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.0
    }
}

impl FromStr for OrderNumber {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, not yet shipped
    #[default]
    Pending,
    /// Handed to the courier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "Pending",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        })
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery
    CashOnDelivery,
    /// Credit or debit card
    CreditCard,
}

impl PaymentMethod {
    /// Label shown to customers.
    pub fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::CreditCard => "Credit/Debit Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cash_on_delivery" | "cod" => Ok(Self::CashOnDelivery),
            "credit_card" | "card" => Ok(Self::CreditCard),
            _ => Err(OrderParseError::UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street address
    pub line1: String,

    /// Apartment, suite and so on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,

    /// City
    pub city: String,

    /// Country
    pub country: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line1)?;

        if let Some(line2) = &self.line2 {
            write!(f, ", {line2}")?;
        }

        write!(f, ", {}, {}", self.city, self.country)
    }
}

/// Customer contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Delivery address
    pub address: Address,

    /// Opted in to the newsletter
    #[serde(default)]
    pub subscribe: bool,
}

impl Customer {
    /// First and last name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A line of an order, with the title and prices captured at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product reference
    pub product: ProductId,

    /// Product title when the order was placed
    pub title: String,

    /// Unit price when the order was placed
    #[serde(with = "price_serde")]
    pub unit_price: Price,

    /// Product discount when the order was placed
    #[serde(default)]
    pub discount: DiscountPercent,

    /// Units ordered
    pub quantity: NonZeroU32,
}

impl OrderLine {
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

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product.clone(),
            title: item.name.clone(),
            unit_price: item.unit_price,
            discount: item.discount,
            quantity: item.quantity,
        }
    }
}

/// Order amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of discounted line totals
    #[serde(with = "price_serde")]
    pub subtotal: Price,

    /// Shipping fee
    #[serde(with = "price_serde")]
    pub shipping: Price,

    /// Promo discount
    #[serde(with = "price_serde")]
    pub discount: Price,

    /// Amount payable
    #[serde(with = "price_serde")]
    pub total: Price,
}

impl From<&Quote> for OrderTotals {
    fn from(quote: &Quote) -> Self {
        Self {
            subtotal: quote.subtotal,
            shipping: quote.shipping,
            discount: quote.discount,
            total: quote.total,
        }
    }
}

/// An order payload ready to submit. The orders service assigns its number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Contact and delivery details
    pub customer: Customer,

    /// Captured lines
    pub lines: Vec<OrderLine>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Amounts
    pub totals: OrderTotals,

    /// Applied promo code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,

    /// Delivery notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the customer submitted the order
    pub placed_at: Timestamp,
}

/// A placed order. Never changed by the storefront after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order number
    pub number: OrderNumber,

    /// Fulfilment state
    #[serde(default)]
    pub status: OrderStatus,

    /// Contact and delivery details
    pub customer: Customer,

    /// Captured lines
    pub lines: Vec<OrderLine>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Amounts
    pub totals: OrderTotals,

    /// Applied promo code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,

    /// Delivery notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the order was placed
    pub placed_at: Timestamp,
}

impl Order {
    /// Turn a submitted payload into a pending order.
    pub fn place(number: OrderNumber, order: NewOrder) -> Self {
        Self {
            number,
            status: OrderStatus::Pending,
            customer: order.customer,
            lines: order.lines,
            payment_method: order.payment_method,
            totals: order.totals,
            promo_code: order.promo_code,
            notes: order.notes,
            placed_at: order.placed_at,
        }
    }

    /// Order currency.
    pub fn currency(&self) -> &'static Currency {
        self.totals.total.currency()
    }

    /// Total units ordered.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }
}
