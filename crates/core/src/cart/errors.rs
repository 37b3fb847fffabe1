//! Cart Errors

use thiserror::Error;

use crate::{cart::models::LineId, products::ProductId, storage::StorageError};

/// Errors raised by the cart store.
#[derive(Debug, Error)]
pub enum CartError {
    /// No line with this identity is in the cart.
    #[error("cart line {0} not found")]
    LineNotFound(LineId),

    /// The product cannot be added because it is out of stock.
    #[error("product {0} is out of stock")]
    Unavailable(ProductId),

    /// A product or stored line is priced in a different currency than the cart.
    #[error("item has currency {actual}, but the cart has currency {expected}")]
    CurrencyMismatch {
        /// Cart currency code
        expected: &'static str,

        /// Offending currency code
        actual: &'static str,
    },

    /// Persisting the cart failed; the cart is unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
