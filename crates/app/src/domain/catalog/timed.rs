//! Catalog requests bounded by a timeout.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use storefront::products::{Product, ProductId};
use tokio::time::timeout;

use crate::domain::catalog::{errors::CatalogServiceError, service::CatalogService};

/// Wraps a catalog so every request fails with [`CatalogServiceError::Timeout`] once it runs
/// past the bound.
#[derive(Clone)]
pub struct TimedCatalogService {
    inner: Arc<dyn CatalogService>,
    request_timeout: Duration,
}

impl TimedCatalogService {
    #[must_use]
    pub fn new(inner: Arc<dyn CatalogService>, request_timeout: Duration) -> Self {
        Self {
            inner,
            request_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        request: impl Future<Output = Result<T, CatalogServiceError>>,
    ) -> Result<T, CatalogServiceError> {
        timeout(self.request_timeout, request)
            .await
            .map_err(|_elapsed| CatalogServiceError::Timeout(self.request_timeout))?
    }
}

#[async_trait]
impl CatalogService for TimedCatalogService {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        self.bounded(self.inner.list_products()).await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogServiceError> {
        self.bounded(self.inner.get_product(id)).await
    }

    async fn get_product_by_slug(&self, slug: &str) -> Result<Product, CatalogServiceError> {
        self.bounded(self.inner.get_product_by_slug(slug)).await
    }

    async fn product_exists(&self, id: &ProductId) -> Result<bool, CatalogServiceError> {
        self.bounded(self.inner.product_exists(id)).await
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, CatalogServiceError> {
        self.bounded(self.inner.search_products(query)).await
    }

    async fn products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogServiceError> {
        self.bounded(self.inner.products_by_category(category)).await
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::catalog::MockCatalogService, test::helpers::SlowCatalog};

    use super::*;

    #[tokio::test]
    async fn test_fast_requests_pass_through() -> TestResult {
        let mut inner = MockCatalogService::new();
        inner
            .expect_product_exists()
            .times(1)
            .returning(|_| Ok(true));

        let catalog = TimedCatalogService::new(Arc::new(inner), Duration::from_secs(1));

        assert!(catalog.product_exists(&ProductId::new("p-1")).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_slow_requests_time_out() {
        let catalog = TimedCatalogService::new(Arc::new(SlowCatalog), Duration::from_millis(10));

        let result = catalog.get_product(&ProductId::new("p-1")).await;

        assert!(matches!(
            result,
            Err(CatalogServiceError::Timeout(bound)) if bound == Duration::from_millis(10)
        ));
    }
}
