//! Orders

pub mod errors;
pub mod service;
pub mod timed;

pub use errors::OrdersServiceError;
pub use service::*;
pub use timed::TimedOrdersService;
