//! Storefront
//!
//! Storefront is the domain core of a small branded web shop: a product catalog model, a
//! persisted shopping cart and wishlist, pricing with shipping tiers and a promo code, and a
//! checkout state machine that turns a cart into an order.

pub mod branding;
pub mod cart;
pub mod checkout;
pub mod discounts;
pub mod fixtures;
pub mod money;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod storage;
pub mod subscribers;
pub mod wishlist;
