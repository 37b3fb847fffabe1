use clap::{Args, Subcommand};
use storefront::products::{Product, ProductId};
use storefront_app::{context::AppContext, domain::catalog::CatalogServiceError};

use super::report;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List products
    List(ListProductsArgs),

    /// Show one product
    Show(ShowProductArgs),

    /// Search product names
    Search(SearchProductsArgs),
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    /// Only list products in this category
    #[arg(long)]
    category: Option<String>,
}

#[derive(Debug, Args)]
struct ShowProductArgs {
    /// Product identifier or slug
    product: String,
}

#[derive(Debug, Args)]
struct SearchProductsArgs {
    /// Text to look for in product names
    query: String,
}

pub(crate) async fn run(context: &AppContext, command: ProductsCommand) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List(args) => list(context, args).await,
        ProductsSubcommand::Show(args) => show(context, args).await,
        ProductsSubcommand::Search(args) => search(context, args).await,
    }
}

async fn list(context: &AppContext, args: ListProductsArgs) -> Result<(), String> {
    let products = match &args.category {
        Some(category) => context.catalog.products_by_category(category).await,
        None => context.catalog.list_products().await,
    }
    .map_err(|error| format!("failed to list products: {}", report(&error)))?;

    print_products(&products)
}

async fn search(context: &AppContext, args: SearchProductsArgs) -> Result<(), String> {
    let products = context
        .catalog
        .search_products(&args.query)
        .await
        .map_err(|error| format!("failed to search products: {}", report(&error)))?;

    print_products(&products)
}

async fn show(context: &AppContext, args: ShowProductArgs) -> Result<(), String> {
    let product = match context
        .catalog
        .get_product(&ProductId::new(args.product.as_str()))
        .await
    {
        Err(CatalogServiceError::NotFound) => {
            context.catalog.get_product_by_slug(&args.product).await
        }
        other => other,
    }
    .map_err(|error| format!("failed to load product {}: {}", args.product, report(&error)))?;

    let price = product
        .discounted_price()
        .map_err(|error| format!("failed to price {}: {error}", product.id))?;

    println!("name: {}", product.name);
    println!("id: {}", product.id);
    println!("slug: {}", product.slug);
    println!("category: {}", product.category);
    println!("availability: {}", product.availability.label());

    if product.discount.is_zero() {
        println!("price: {price}");
    } else {
        println!("price: {price} (was {}, {} off)", product.price, product.discount);
    }

    if !product.sizes.is_empty() {
        println!("sizes: {}", product.sizes.join(", "));
    }

    match product.average_rating() {
        Some(rating) => println!("rating: {rating} ({} reviews)", product.reviews.len()),
        None => println!("rating: no reviews yet"),
    }

    if !product.related.is_empty() {
        let related: Vec<&str> = product.related.iter().map(ProductId::as_str).collect();

        println!("related: {}", related.join(", "));
    }

    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }

    Ok(())
}

pub(crate) fn print_products(products: &[Product]) -> Result<(), String> {
    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    for product in products {
        let price = product
            .discounted_price()
            .map_err(|error| format!("failed to price {}: {error}", product.id))?;

        let discount = if product.discount.is_zero() {
            String::new()
        } else {
            format!(" (-{})", product.discount)
        };

        println!(
            "{:<28} {:<32} {price}{discount}  [{}]",
            product.id.as_str(),
            product.name,
            product.availability.label()
        );
    }

    Ok(())
}
