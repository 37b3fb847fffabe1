//! Test Helpers

use std::{error::Error, num::NonZeroU32, time::Duration};

use async_trait::async_trait;
use jiff::Timestamp;
use rusty_money::{Money, iso::PKR};
use storefront::{
    cart::{CartItem, CartStore, SelectedOptions},
    checkout::{Checkout, CheckoutError},
    money::Price,
    orders::{
        Address, Customer, NewOrder, Order, OrderLine, OrderNumber, OrderTotals, PaymentMethod,
    },
    pricing::PricingEngine,
    products::{Product, ProductId},
    storage::MemoryStorage,
};

use crate::domain::{
    catalog::{CatalogService, CatalogServiceError},
    orders::{OrdersService, OrdersServiceError},
};

const STALL: Duration = Duration::from_secs(30);

pub(crate) fn rupees(amount: i64) -> Price {
    Money::from_major(amount, PKR)
}

pub(crate) fn engine() -> PricingEngine {
    PricingEngine::standard(PKR)
}

pub(crate) fn customer() -> Customer {
    Customer {
        first_name: "Ayesha".to_string(),
        last_name: "Raza".to_string(),
        email: "ayesha@example.com".to_string(),
        phone: "03331234567".to_string(),
        address: Address {
            line1: "14 Mall Road".to_string(),
            line2: None,
            city: "Lahore".to_string(),
            country: "Pakistan".to_string(),
        },
        subscribe: false,
    }
}

pub(crate) fn new_order(placed_at: Timestamp) -> Result<NewOrder, Box<dyn Error>> {
    let product = Product::new("p-biryani", "Chicken Biryani", rupees(1_000));
    let item = CartItem::from_product(
        &product,
        NonZeroU32::new(2).ok_or("zero quantity")?,
        SelectedOptions::default(),
    );

    Ok(NewOrder {
        customer: customer(),
        lines: vec![OrderLine::from(&item)],
        payment_method: PaymentMethod::CashOnDelivery,
        totals: OrderTotals {
            subtotal: rupees(2_000),
            shipping: rupees(250),
            discount: rupees(0),
            total: rupees(2_250),
        },
        promo_code: None,
        notes: None,
        placed_at,
    })
}

pub(crate) fn cart_with(
    lines: &[(&Product, u32)],
) -> Result<CartStore<MemoryStorage>, Box<dyn Error>> {
    let mut cart = CartStore::load(MemoryStorage::new(), PKR)?;

    for (product, quantity) in lines {
        cart.add_item(
            product,
            NonZeroU32::new(*quantity).ok_or("zero quantity")?,
            SelectedOptions::default(),
        )?;
    }

    Ok(cart)
}

pub(crate) fn fill_form(checkout: &mut Checkout) -> Result<(), CheckoutError> {
    let form = checkout.form_mut()?;

    form.first_name = "Ayesha".to_string();
    form.last_name = "Raza".to_string();
    form.email = "ayesha@example.com".to_string();
    form.address_line1 = "14 Mall Road".to_string();
    form.city = "Lahore".to_string();
    form.phone = "03331234567".to_string();
    form.payment_method = Some(PaymentMethod::CashOnDelivery);
    form.terms_accepted = true;

    Ok(())
}

/// Catalog whose every request stalls.
pub(crate) struct SlowCatalog;

#[async_trait]
impl CatalogService for SlowCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        tokio::time::sleep(STALL).await;

        Ok(Vec::new())
    }

    async fn get_product(&self, _id: &ProductId) -> Result<Product, CatalogServiceError> {
        tokio::time::sleep(STALL).await;

        Err(CatalogServiceError::NotFound)
    }

    async fn get_product_by_slug(&self, _slug: &str) -> Result<Product, CatalogServiceError> {
        tokio::time::sleep(STALL).await;

        Err(CatalogServiceError::NotFound)
    }

    async fn product_exists(&self, _id: &ProductId) -> Result<bool, CatalogServiceError> {
        tokio::time::sleep(STALL).await;

        Ok(true)
    }

    async fn search_products(&self, _query: &str) -> Result<Vec<Product>, CatalogServiceError> {
        tokio::time::sleep(STALL).await;

        Ok(Vec::new())
    }

    async fn products_by_category(
        &self,
        _category: &str,
    ) -> Result<Vec<Product>, CatalogServiceError> {
        tokio::time::sleep(STALL).await;

        Ok(Vec::new())
    }
}

/// Orders store whose every request stalls.
pub(crate) struct SlowOrders;

#[async_trait]
impl OrdersService for SlowOrders {
    async fn create_order(&self, _order: NewOrder) -> Result<Order, OrdersServiceError> {
        tokio::time::sleep(STALL).await;

        Err(OrdersServiceError::AlreadyExists)
    }

    async fn get_order(&self, _number: &OrderNumber) -> Result<Order, OrdersServiceError> {
        tokio::time::sleep(STALL).await;

        Err(OrdersServiceError::NotFound)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        tokio::time::sleep(STALL).await;

        Ok(Vec::new())
    }
}
