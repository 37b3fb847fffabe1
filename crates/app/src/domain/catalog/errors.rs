//! Catalog service errors.

use std::{io, time::Duration};

use storefront::fixtures::FixtureError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("product not found")]
    NotFound,

    #[error("failed to read catalog")]
    Io(#[source] io::Error),

    #[error("invalid catalog")]
    Fixture(#[from] FixtureError),

    #[error("catalog request timed out after {0:?}")]
    Timeout(Duration),
}
