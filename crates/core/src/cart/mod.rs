//! Cart
//!
//! The persisted shopping cart. A [`CartStore`] owns its lines and a [`Storage`] backend;
//! every mutation is written to storage before it becomes visible in memory, and subscribers
//! are told about each committed change.
//!
//! [`Storage`]: crate::storage::Storage

pub mod errors;
pub mod models;
pub mod store;

pub use errors::CartError;
pub use models::{CartItem, LineId, SelectedOptions};
pub use store::{CART_KEY, CartEvent, CartStore, QuantityChange};
