use clap::{Args, Subcommand};
use storefront::products::ProductId;
use storefront_app::{
    context::AppContext,
    wishlist::{reconcile, wishlist_products},
};

use super::{products::print_products, report};

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    /// Add a product to the wishlist, or remove it if already there
    Toggle(ToggleArgs),

    /// List wishlisted products
    List,

    /// Drop products that are no longer listed
    Prune,
}

#[derive(Debug, Args)]
struct ToggleArgs {
    /// Product identifier
    product: String,
}

pub(crate) async fn run(context: &AppContext, command: WishlistCommand) -> Result<(), String> {
    match command.command {
        WishlistSubcommand::Toggle(args) => toggle(context, args).await,
        WishlistSubcommand::List => list(context).await,
        WishlistSubcommand::Prune => prune(context).await,
    }
}

async fn toggle(context: &AppContext, args: ToggleArgs) -> Result<(), String> {
    let id = ProductId::new(args.product);

    let mut wishlist = context
        .wishlist()
        .map_err(|error| format!("failed to load wishlist: {}", report(&error)))?;

    // Unknown products may only be taken off the list.
    if !wishlist.contains(&id)
        && !context
            .catalog
            .product_exists(&id)
            .await
            .map_err(|error| format!("failed to look up {id}: {}", report(&error)))?
    {
        return Err(format!("product {id} not found"));
    }

    let present = wishlist
        .toggle(id.clone())
        .map_err(|error| format!("failed to update wishlist: {}", report(&error)))?;

    if present {
        println!("{id}: added to wishlist ({} saved)", wishlist.len());
    } else {
        println!("{id}: removed from wishlist ({} saved)", wishlist.len());
    }

    Ok(())
}

async fn list(context: &AppContext) -> Result<(), String> {
    let wishlist = context
        .wishlist()
        .map_err(|error| format!("failed to load wishlist: {}", report(&error)))?;

    let products = wishlist_products(context.catalog.as_ref(), &wishlist)
        .await
        .map_err(|error| format!("failed to load wishlist products: {}", report(&error)))?;

    print_products(&products)?;

    let stale = wishlist.len().saturating_sub(products.len());

    if stale > 0 {
        println!("{stale} saved products are no longer listed; run `storefront wishlist prune`");
    }

    Ok(())
}

async fn prune(context: &AppContext) -> Result<(), String> {
    let mut wishlist = context
        .wishlist()
        .map_err(|error| format!("failed to load wishlist: {}", report(&error)))?;

    let removed = reconcile(context.catalog.as_ref(), &mut wishlist)
        .await
        .map_err(|error| format!("failed to prune wishlist: {}", report(&error)))?;

    if removed.is_empty() {
        println!("wishlist is up to date");
    }

    for id in removed {
        println!("{id}: removed");
    }

    Ok(())
}
