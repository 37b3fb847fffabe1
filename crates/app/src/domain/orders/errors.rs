//! Orders service errors.

use std::{io, time::Duration};

use storefront::orders::OrderParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("storage error")]
    Io(#[source] io::Error),

    #[error("invalid order document")]
    Json(#[from] serde_json::Error),

    #[error("invalid order number")]
    InvalidNumber(#[from] OrderParseError),

    #[error("orders request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<io::Error> for OrdersServiceError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            _ => Self::Io(error),
        }
    }
}
