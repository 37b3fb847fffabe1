//! Integration tests for taking a persisted cart through checkout.

use std::num::NonZeroU32;

use jiff::Timestamp;
use rusty_money::{Money, iso::PKR};
use testresult::TestResult;

use storefront::{
    branding::Brand,
    cart::{CartStore, SelectedOptions},
    checkout::{Checkout, CheckoutPhase},
    orders::{Order, OrderNumber, PaymentMethod},
    pricing::PricingEngine,
    products::Product,
    receipt::write_order_document,
    storage::FileStorage,
};

fn fill(checkout: &mut Checkout) -> TestResult {
    let form = checkout.form_mut()?;

    form.first_name = "Bilal".to_string();
    form.last_name = "Khan".to_string();
    form.email = "bilal@example.com".to_string();
    form.address_line1 = "22 Canal View".to_string();
    form.city = "Lahore".to_string();
    form.phone = "03211234567".to_string();
    form.payment_method = Some(PaymentMethod::CreditCard);
    form.terms_accepted = true;
    form.promo_code = "discount10".to_string();

    Ok(())
}

#[test]
fn placed_order_keeps_captured_prices_after_catalog_changes() -> TestResult {
    let dir = tempfile::tempdir()?;
    let brand = Brand::ma_tailor();
    let currency = brand.currency()?;
    let engine = PricingEngine::standard(currency);

    let mut product = Product::new("p-lawn", "Lawn 3-Piece", Money::from_major(12_000, PKR));

    let mut cart = CartStore::load(FileStorage::new(dir.path()), currency)?;
    cart.add_item(
        &product,
        NonZeroU32::new(2).ok_or("zero")?,
        SelectedOptions::sized("M").customize("stitching", "regular"),
    )?;

    // The cart survives a reload from disk.
    let mut cart = CartStore::load(FileStorage::new(dir.path()), currency)?;
    assert_eq!(cart.item_count(), 2);

    let mut checkout = Checkout::new(&brand.default_country);
    fill(&mut checkout)?;

    let draft = checkout.begin_submission(cart.items(), &engine, Timestamp::UNIX_EPOCH)?;

    // The catalog reprices after the order was captured.
    product.price = Money::from_major(15_000, PKR);

    let order = Order::place(OrderNumber::new("ORD-100")?, draft);
    checkout.complete(order.number.clone())?;
    cart.clear()?;

    assert_eq!(checkout.phase(), &CheckoutPhase::Succeeded(order.number.clone()));
    assert!(CartStore::load(FileStorage::new(dir.path()), currency)?.is_empty());

    assert_eq!(order.totals.subtotal, Money::from_major(24_000, PKR));
    assert_eq!(order.totals.discount, Money::from_major(2_400, PKR));
    assert_eq!(order.totals.shipping, Money::from_major(600, PKR));
    assert_eq!(order.totals.total, Money::from_major(22_200, PKR));
    assert_eq!(order.promo_code.as_deref(), Some("DISCOUNT10"));
    assert_eq!(
        order.lines.first().map(|line| line.unit_price),
        Some(Money::from_major(12_000, PKR))
    );
    assert_ne!(
        order.lines.first().map(|line| line.unit_price),
        Some(product.price)
    );

    let mut document = Vec::new();
    write_order_document(&mut document, &order, &brand)?;
    let document = String::from_utf8(document)?;

    assert!(document.contains("MA Tailor"));
    assert!(document.contains("Discount (DISCOUNT10):"));

    Ok(())
}
