use std::{io, path::PathBuf};

use clap::{Args, Subcommand};
use storefront::{orders::OrderNumber, receipt::write_order_document};
use storefront_app::{
    confirmation::{export_confirmation, load_confirmation},
    context::AppContext,
};

use super::report;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// List placed orders
    List,

    /// Print an order confirmation
    Show(ShowOrderArgs),

    /// Write an order confirmation to `Order_<number>.txt`
    Export(ExportOrderArgs),
}

#[derive(Debug, Args)]
struct ShowOrderArgs {
    /// Order number
    number: OrderNumber,
}

#[derive(Debug, Args)]
struct ExportOrderArgs {
    /// Order number
    number: OrderNumber,

    /// Directory to write the document into
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

pub(crate) async fn run(context: &AppContext, command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::List => list(context).await,
        OrderSubcommand::Show(args) => show(context, args).await,
        OrderSubcommand::Export(args) => export(context, args).await,
    }
}

async fn list(context: &AppContext) -> Result<(), String> {
    let orders = context
        .orders
        .list_orders()
        .await
        .map_err(|error| format!("failed to list orders: {}", report(&error)))?;

    if orders.is_empty() {
        println!("no orders placed yet");
        return Ok(());
    }

    for order in orders {
        println!(
            "{}  {}  {:<10} {}",
            order.number,
            order.placed_at,
            order.status.to_string(),
            order.totals.total
        );
    }

    Ok(())
}

async fn show(context: &AppContext, args: ShowOrderArgs) -> Result<(), String> {
    let order = load_confirmation(context.orders.as_ref(), context.catalog.as_ref(), &args.number)
        .await
        .map_err(|error| format!("failed to load order {}: {}", args.number, report(&error)))?;

    write_order_document(io::stdout().lock(), &order, &context.brand)
        .map_err(|error| format!("failed to print order {}: {}", args.number, report(&error)))
}

async fn export(context: &AppContext, args: ExportOrderArgs) -> Result<(), String> {
    let order = load_confirmation(context.orders.as_ref(), context.catalog.as_ref(), &args.number)
        .await
        .map_err(|error| format!("failed to load order {}: {}", args.number, report(&error)))?;

    let path = export_confirmation(&order, &context.brand, &args.out)
        .await
        .map_err(|error| format!("failed to export order {}: {}", args.number, report(&error)))?;

    println!("wrote {}", path.display());

    Ok(())
}
