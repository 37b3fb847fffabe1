use std::error::Error;

use clap::{Parser, Subcommand};
use storefront_app::{
    config::{AppConfig, LoggingConfig},
    context::AppContext,
};

mod cart;
mod checkout;
mod order;
mod products;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Products(products::ProductsCommand),

    /// Manage the cart
    Cart(cart::CartCommand),

    /// Manage the wishlist
    Wishlist(wishlist::WishlistCommand),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),

    /// Review placed orders
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.config.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config)
            .await
            .map_err(|error| format!("failed to start storefront: {}", report(&error)))?;

        match self.command {
            Commands::Products(command) => products::run(&context, command).await,
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Wishlist(command) => wishlist::run(&context, command).await,
            Commands::Checkout(args) => checkout::run(&context, args).await,
            Commands::Order(command) => order::run(&context, command).await,
        }
    }
}

/// Render an error with its chain of sources.
pub(crate) fn report(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
