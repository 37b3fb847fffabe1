//! Catalog

pub mod errors;
pub mod service;
pub mod timed;

pub use errors::CatalogServiceError;
pub use service::*;
pub use timed::TimedCatalogService;
