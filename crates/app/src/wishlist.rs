//! Wishlist reconciliation against the live catalog.

use rustc_hash::FxHashSet;
use storefront::{
    products::{Product, ProductId},
    storage::Storage,
    wishlist::{WishlistError, WishlistStore},
};
use thiserror::Error;
use tracing::warn;

use crate::domain::catalog::{CatalogService, CatalogServiceError};

#[derive(Debug, Error)]
pub enum WishlistSyncError {
    #[error("failed to fetch catalog")]
    Catalog(#[from] CatalogServiceError),

    #[error(transparent)]
    Wishlist(#[from] WishlistError),
}

/// Drop wishlist entries whose products are no longer listed. Returns the removed entries.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or the pruned wishlist cannot be saved.
#[tracing::instrument(name = "wishlist.reconcile", skip_all, fields(entries = wishlist.len()), err)]
pub async fn reconcile<S: Storage>(
    catalog: &dyn CatalogService,
    wishlist: &mut WishlistStore<S>,
) -> Result<Vec<ProductId>, WishlistSyncError> {
    let live: FxHashSet<ProductId> = catalog
        .list_products()
        .await?
        .into_iter()
        .map(|product| product.id)
        .collect();

    let removed = wishlist.prune(|id| live.contains(id))?;

    if !removed.is_empty() {
        warn!(removed = removed.len(), "pruned stale wishlist entries");
    }

    Ok(removed)
}

/// Resolve wishlist entries to catalog products, in catalog order. Stale entries are skipped.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn wishlist_products<S: Storage>(
    catalog: &dyn CatalogService,
    wishlist: &WishlistStore<S>,
) -> Result<Vec<Product>, CatalogServiceError> {
    let products = catalog.list_products().await?;

    Ok(products
        .into_iter()
        .filter(|product| wishlist.contains(&product.id))
        .collect())
}

#[cfg(test)]
mod tests {
    use storefront::storage::MemoryStorage;
    use testresult::TestResult;

    use crate::{domain::catalog::MockCatalogService, test::helpers::rupees};

    use super::*;

    fn catalog() -> MockCatalogService {
        let mut catalog = MockCatalogService::new();

        catalog.expect_list_products().returning(|| {
            Ok(vec![
                Product::new("p-1", "Lawn Suit", rupees(6_500)),
                Product::new("p-2", "Kurta", rupees(4_800)),
            ])
        });

        catalog
    }

    #[tokio::test]
    async fn test_reconcile_prunes_missing_products() -> TestResult {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::load(storage.clone())?;

        wishlist.toggle(ProductId::new("p-2"))?;
        wishlist.toggle(ProductId::new("p-retired"))?;

        let removed = reconcile(&catalog(), &mut wishlist).await?;

        assert_eq!(removed, vec![ProductId::new("p-retired")]);
        assert!(wishlist.contains(&ProductId::new("p-2")));
        assert_eq!(WishlistStore::load(storage)?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_catalog_failure_keeps_wishlist() -> TestResult {
        let mut catalog = MockCatalogService::new();
        catalog
            .expect_list_products()
            .returning(|| Err(CatalogServiceError::Io(std::io::Error::other("offline"))));

        let mut wishlist = WishlistStore::load(MemoryStorage::new())?;
        wishlist.toggle(ProductId::new("p-1"))?;

        let result = reconcile(&catalog, &mut wishlist).await;

        assert!(matches!(result, Err(WishlistSyncError::Catalog(_))));
        assert_eq!(wishlist.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_wishlist_products_resolves_live_entries() -> TestResult {
        let mut wishlist = WishlistStore::load(MemoryStorage::new())?;

        wishlist.toggle(ProductId::new("p-1"))?;
        wishlist.toggle(ProductId::new("p-retired"))?;

        let products = wishlist_products(&catalog(), &wishlist).await?;
        let names: Vec<_> = products.iter().map(|product| product.name.as_str()).collect();

        assert_eq!(names, vec!["Lawn Suit"]);

        Ok(())
    }
}
