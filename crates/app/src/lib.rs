//! Storefront application layer: catalog and orders services, checkout submission and the
//! stores wired together for the CLI.

pub mod checkout;
pub mod config;
pub mod confirmation;
pub mod context;
pub mod domain;
pub mod logging;
pub mod wishlist;

#[cfg(test)]
mod test;
