//! Receipt
//!
//! Plain-text order confirmation document: a header, a table of lines and a summary.

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Alignment, Style, Theme, object::Columns},
};
use thiserror::Error;

use crate::{branding::Brand, orders::Order, pricing::PricingError};

/// Errors that can occur when writing an order document.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing the document failed.
    #[error("failed to write order document: {0}")]
    Io(#[from] io::Error),
}

/// File name the storefront uses for an exported order document.
pub fn document_file_name(order: &Order) -> String {
    format!("Order_{}.txt", order.number)
}

/// Write the confirmation document for `order`.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if a line total overflows or `out` fails.
pub fn write_order_document(
    mut out: impl io::Write,
    order: &Order,
    brand: &Brand,
) -> Result<(), ReceiptError> {
    write_header(&mut out, order, brand)?;
    write_lines_table(&mut out, order)?;
    write_summary(&mut out, order)?;
    write_footer(&mut out, order, brand)?;

    Ok(())
}

fn write_header(out: &mut impl io::Write, order: &Order, brand: &Brand) -> Result<(), ReceiptError> {
    writeln!(out, "{}", brand.name)?;

    if !brand.tagline.is_empty() {
        writeln!(out, "{}", brand.tagline)?;
    }

    writeln!(out)?;
    writeln!(out, "Order Confirmation")?;
    writeln!(out, "Order number: {}", order.number)?;
    writeln!(out, "Placed:       {}", order.placed_at)?;
    writeln!(out, "Status:       {}", order.status)?;

    Ok(())
}

fn write_lines_table(out: &mut impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Item", "Qty", "Unit Price", "Discount", "Line Total"]);

    for (idx, line) in order.lines.iter().enumerate() {
        let discount = if line.discount.is_zero() {
            String::new()
        } else {
            format!("-{}", line.discount)
        };

        builder.push_record([
            format!("{}", idx + 1),
            line.title.clone(),
            line.quantity.to_string(),
            format!("{}", line.unit_price),
            discount,
            format!("{}", line.line_total()?),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Columns::new(2..6), Alignment::right());

    writeln!(out, "\n{table}")?;

    Ok(())
}

fn write_summary(out: &mut impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    let totals = &order.totals;

    let discount_label = match &order.promo_code {
        Some(code) => format!("Discount ({code}):"),
        None => "Discount:".to_string(),
    };

    let rows = [
        ("Subtotal:".to_string(), format!("{}", totals.subtotal)),
        ("Shipping:".to_string(), format!("{}", totals.shipping)),
        (discount_label, format!("-{}", totals.discount)),
        ("Total:".to_string(), format!("{}", totals.total)),
    ];

    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    writeln!(out)?;

    for (label, value) in &rows {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    Ok(())
}

fn write_footer(out: &mut impl io::Write, order: &Order, brand: &Brand) -> Result<(), ReceiptError> {
    let customer = &order.customer;

    writeln!(out)?;
    writeln!(out, "Payment method: {}", order.payment_method)?;
    writeln!(out, "Customer:       {}", customer.full_name())?;
    writeln!(out, "Email:          {}", customer.email)?;
    writeln!(out, "Phone:          {}", customer.phone)?;
    writeln!(out, "Ship to:        {}", customer.address)?;

    if let Some(notes) = &order.notes {
        writeln!(out, "Notes:          {notes}")?;
    }

    if !brand.sign_off.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", brand.sign_off)?;
    }

    Ok(())
}

/// Writes a summary line with a right-aligned label and a right-aligned value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    writeln!(out, "{label:>label_col_width$}  {value:>value_col_width$}")?;

    Ok(())
}
