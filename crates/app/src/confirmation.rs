//! Order confirmation: read-back of a placed order and document export.

use std::{
    io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use storefront::{
    branding::Brand,
    orders::{Order, OrderNumber},
    receipt::{ReceiptError, document_file_name, write_order_document},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    catalog::CatalogService,
    orders::{OrdersService, OrdersServiceError},
};

#[derive(Debug, Error)]
pub enum ConfirmationError {
    #[error("failed to load order")]
    Orders(#[from] OrdersServiceError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to write order document")]
    Io(#[from] io::Error),
}

/// Load a placed order for display. Line titles follow the live catalog where the product is
/// still listed and fall back to the titles captured at checkout.
///
/// # Errors
///
/// Returns [`ConfirmationError::Orders`] if the order cannot be loaded. Catalog failures only
/// leave the captured titles in place.
#[tracing::instrument(
    name = "confirmation.load",
    skip(orders, catalog, number),
    fields(order_number = %number),
    err
)]
pub async fn load_confirmation(
    orders: &dyn OrdersService,
    catalog: &dyn CatalogService,
    number: &OrderNumber,
) -> Result<Order, ConfirmationError> {
    let mut order = orders.get_order(number).await?;

    match catalog.list_products().await {
        Ok(products) => {
            let titles: FxHashMap<_, _> = products
                .into_iter()
                .map(|product| (product.id, product.name))
                .collect();

            for line in &mut order.lines {
                if let Some(title) = titles.get(&line.product) {
                    line.title.clone_from(title);
                }
            }
        }
        Err(error) => warn!(%error, "catalog unavailable; using captured line titles"),
    }

    Ok(order)
}

/// Write the order document into `dir` as `Order_<number>.txt` and return its path.
///
/// # Errors
///
/// Returns an error if the document cannot be rendered or written.
pub async fn export_confirmation(
    order: &Order,
    brand: &Brand,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, ConfirmationError> {
    let mut document = Vec::new();

    write_order_document(&mut document, order, brand)?;

    let path = dir.as_ref().join(document_file_name(order));

    tokio::fs::write(&path, document).await?;

    info!(order_number = %order.number, path = %path.display(), "exported order document");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use jiff::Timestamp;
    use storefront::products::Product;
    use testresult::TestResult;

    use crate::{
        domain::{
            catalog::{CatalogServiceError, MockCatalogService, TimedCatalogService},
            orders::{MockOrdersService, TimedOrdersService},
        },
        test::helpers::{SlowCatalog, SlowOrders, new_order, rupees},
    };

    use super::*;

    fn orders() -> Result<MockOrdersService, Box<dyn std::error::Error>> {
        let order = Order::place(OrderNumber::new("ORD-9")?, new_order(Timestamp::UNIX_EPOCH)?);
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .withf(|number| number.as_str() == "ORD-9")
            .returning(move |_| Ok(order.clone()));

        Ok(orders)
    }

    #[tokio::test]
    async fn test_titles_follow_live_catalog() -> TestResult {
        let mut catalog = MockCatalogService::new();
        catalog.expect_list_products().returning(|| {
            Ok(vec![Product::new(
                "p-biryani",
                "Chicken Biryani (Family)",
                rupees(1_400),
            )])
        });

        let order = load_confirmation(&orders()?, &catalog, &OrderNumber::new("ORD-9")?).await?;

        assert_eq!(
            order.lines.first().map(|line| line.title.as_str()),
            Some("Chicken Biryani (Family)")
        );
        assert_eq!(
            order.lines.first().map(|line| line.unit_price),
            Some(rupees(1_000))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_removed_product_keeps_captured_title() -> TestResult {
        let mut catalog = MockCatalogService::new();
        catalog.expect_list_products().returning(|| Ok(Vec::new()));

        let order = load_confirmation(&orders()?, &catalog, &OrderNumber::new("ORD-9")?).await?;

        assert_eq!(
            order.lines.first().map(|line| line.title.as_str()),
            Some("Chicken Biryani")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_failure_keeps_captured_title() -> TestResult {
        let mut catalog = MockCatalogService::new();
        catalog
            .expect_list_products()
            .returning(|| Err(CatalogServiceError::Io(io::Error::other("offline"))));

        let order = load_confirmation(&orders()?, &catalog, &OrderNumber::new("ORD-9")?).await?;

        assert_eq!(
            order.lines.first().map(|line| line.title.as_str()),
            Some("Chicken Biryani")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_slow_catalog_times_out_to_captured_titles() -> TestResult {
        let catalog = TimedCatalogService::new(Arc::new(SlowCatalog), Duration::from_millis(10));

        let order = tokio::time::timeout(
            Duration::from_secs(1),
            load_confirmation(&orders()?, &catalog, &OrderNumber::new("ORD-9")?),
        )
        .await??;

        assert_eq!(
            order.lines.first().map(|line| line.title.as_str()),
            Some("Chicken Biryani")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_slow_order_read_back_is_a_timeout() -> TestResult {
        let orders = TimedOrdersService::new(Arc::new(SlowOrders), Duration::from_millis(10));

        let mut catalog = MockCatalogService::new();
        catalog.expect_list_products().never();

        let result = load_confirmation(&orders, &catalog, &OrderNumber::new("ORD-9")?).await;

        assert!(matches!(
            result,
            Err(ConfirmationError::Orders(OrdersServiceError::Timeout(_)))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_order_is_an_error() -> TestResult {
        let mut orders = MockOrdersService::new();
        orders
            .expect_get_order()
            .returning(|_| Err(OrdersServiceError::NotFound));

        let mut catalog = MockCatalogService::new();
        catalog.expect_list_products().never();

        let result = load_confirmation(&orders, &catalog, &OrderNumber::new("ORD-0")?).await;

        assert!(matches!(
            result,
            Err(ConfirmationError::Orders(OrdersServiceError::NotFound))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_export_writes_named_document() -> TestResult {
        let dir = tempfile::tempdir()?;
        let order = Order::place(OrderNumber::new("ORD-9")?, new_order(Timestamp::UNIX_EPOCH)?);

        let path = export_confirmation(&order, &Brand::ma_foods(), dir.path()).await?;

        assert_eq!(path, dir.path().join("Order_ORD-9.txt"));

        let document = std::fs::read_to_string(path)?;

        assert!(document.starts_with("MA Foods"));
        assert!(document.contains("Chicken Biryani"));

        Ok(())
    }
}
