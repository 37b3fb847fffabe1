use std::num::NonZeroU32;

use clap::{Args, Subcommand};
use storefront::{
    cart::{LineId, QuantityChange, SelectedOptions},
    pricing::{PromoOutcome, Quote},
    products::ProductId,
};
use storefront_app::context::AppContext;

use super::report;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and its totals
    Show(ShowCartArgs),

    /// Add a product to the cart
    Add(AddItemArgs),

    /// Add one more of a cart line
    Increment(LineArgs),

    /// Take one away from a cart line; a line at one is removed
    Decrement(LineArgs),

    /// Remove a cart line
    Remove(LineArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct ShowCartArgs {
    /// Promo code to preview
    #[arg(long)]
    promo: Option<String>,
}

#[derive(Debug, Args)]
struct AddItemArgs {
    /// Product identifier
    product: String,

    /// Number of units
    #[arg(long, default_value_t = NonZeroU32::MIN)]
    quantity: NonZeroU32,

    /// Size option
    #[arg(long)]
    size: Option<String>,

    /// Customization as `name=value`; may be repeated
    #[arg(long = "custom", value_parser = parse_customization)]
    customizations: Vec<(String, String)>,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Cart line identifier, as shown by `cart show`
    line: String,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show(args) => show(context, &args),
        CartSubcommand::Add(args) => add(context, args).await,
        CartSubcommand::Increment(args) => step(context, &args, QuantityChange::Increment),
        CartSubcommand::Decrement(args) => step(context, &args, QuantityChange::Decrement),
        CartSubcommand::Remove(args) => remove(context, &args),
        CartSubcommand::Clear => clear(context),
    }
}

fn show(context: &AppContext, args: &ShowCartArgs) -> Result<(), String> {
    let cart = context
        .cart()
        .map_err(|error| format!("failed to load cart: {}", report(&error)))?;

    if cart.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    for item in cart.items() {
        let total = item
            .line_total()
            .map_err(|error| format!("failed to price {}: {error}", item.name))?;

        println!(
            "{:<40} {:<28} x{:<4} {total}",
            item.line_id().as_str(),
            item.name,
            item.quantity
        );
    }

    let quote = context
        .engine()
        .quote(cart.items(), args.promo.as_deref())
        .map_err(|error| format!("failed to price cart: {error}"))?;

    println!();
    print_quote(&quote);

    Ok(())
}

fn print_quote(quote: &Quote) {
    for line in quote_lines(quote) {
        println!("{line}");
    }
}

fn quote_lines(quote: &Quote) -> Vec<String> {
    let mut lines = vec![
        format!("subtotal: {}", quote.subtotal),
        format!("shipping: {}", quote.shipping),
        format!("discount: -{}", quote.discount),
        format!("total: {}", quote.total),
    ];

    match &quote.promo {
        PromoOutcome::NotRequested => {}
        PromoOutcome::Applied { code, .. } => lines.push(format!("promo {code} applied")),
        PromoOutcome::Rejected(error) => lines.push(format!("promo not applied: {error}")),
    }

    if quote.rewards.free_gift {
        lines.push("this order qualifies for a free gift".to_string());
    } else {
        lines.push(format!(
            "spend {} more for a free gift",
            quote.rewards.amount_to_free_gift
        ));
    }

    if quote.rewards.coupon_eligible {
        lines.push("this order earns a 10% off coupon for your next purchase".to_string());
    } else {
        lines.push(format!(
            "spend {} more for a 10% off coupon",
            quote.rewards.amount_to_coupon
        ));
    }

    lines
}

async fn add(context: &AppContext, args: AddItemArgs) -> Result<(), String> {
    let product = context
        .catalog
        .get_product(&ProductId::new(args.product.as_str()))
        .await
        .map_err(|error| format!("failed to load product {}: {}", args.product, report(&error)))?;

    if let Some(size) = args
        .size
        .as_ref()
        .filter(|size| !product.sizes.is_empty() && !product.sizes.contains(size))
    {
        return Err(format!(
            "{} is not available in size {size}; choose one of {}",
            product.name,
            product.sizes.join(", ")
        ));
    }

    let options = args.customizations.into_iter().fold(
        args.size.map_or_else(SelectedOptions::default, SelectedOptions::sized),
        |options, (name, value)| options.customize(name, value),
    );

    let mut cart = context
        .cart()
        .map_err(|error| format!("failed to load cart: {}", report(&error)))?;

    let line = cart
        .add_item(&product, args.quantity, options)
        .map_err(|error| format!("failed to add {}: {}", product.name, report(&error)))?;

    println!("added {} x {} ({line})", args.quantity, product.name);

    Ok(())
}

fn step(context: &AppContext, args: &LineArgs, change: QuantityChange) -> Result<(), String> {
    let mut cart = context
        .cart()
        .map_err(|error| format!("failed to load cart: {}", report(&error)))?;

    let line = LineId::from(args.line.as_str());

    match cart
        .update_quantity(&line, change)
        .map_err(|error| format!("failed to update cart: {}", report(&error)))?
    {
        Some(quantity) => println!("{line}: quantity {quantity}"),
        None => println!("{line}: removed"),
    }

    Ok(())
}

fn remove(context: &AppContext, args: &LineArgs) -> Result<(), String> {
    let mut cart = context
        .cart()
        .map_err(|error| format!("failed to load cart: {}", report(&error)))?;

    let line = LineId::from(args.line.as_str());

    if cart
        .remove_item(&line)
        .map_err(|error| format!("failed to update cart: {}", report(&error)))?
    {
        println!("{line}: removed");
    } else {
        println!("{line}: not in cart");
    }

    Ok(())
}

fn clear(context: &AppContext) -> Result<(), String> {
    context
        .cart()
        .and_then(|mut cart| cart.clear())
        .map_err(|error| format!("failed to clear cart: {}", report(&error)))?;

    println!("cart cleared");

    Ok(())
}

fn parse_customization(value: &str) -> Result<(String, String), String> {
    let (name, choice) = value
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{value}`"))?;

    let (name, choice) = (name.trim(), choice.trim());

    if name.is_empty() || choice.is_empty() {
        return Err(format!("expected name=value, got `{value}`"));
    }

    Ok((name.to_string(), choice.to_string()))
}
