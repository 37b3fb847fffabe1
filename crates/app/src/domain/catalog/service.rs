//! Catalog service.

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use storefront::{
    fixtures::parse_catalog,
    products::{Product, ProductId},
};

use crate::domain::catalog::errors::CatalogServiceError;

/// Read-only catalog backed by a YAML fixture loaded once at startup.
#[derive(Debug, Clone)]
pub struct FixtureCatalogService {
    products: Arc<Vec<Product>>,
}

impl FixtureCatalogService {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    /// Load the catalog from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Io`] if the file cannot be read, or
    /// [`CatalogServiceError::Fixture`] if it is not a valid catalog.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogServiceError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(CatalogServiceError::Io)?;

        Ok(Self::new(parse_catalog(&yaml)?))
    }

    fn find(&self, predicate: impl Fn(&Product) -> bool) -> Result<Product, CatalogServiceError> {
        self.products
            .iter()
            .find(|product| predicate(product))
            .cloned()
            .ok_or(CatalogServiceError::NotFound)
    }

    fn filter(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.products
            .iter()
            .filter(|product| predicate(product))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CatalogService for FixtureCatalogService {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        Ok(self.products.as_ref().clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogServiceError> {
        self.find(|product| product.id == *id)
    }

    async fn get_product_by_slug(&self, slug: &str) -> Result<Product, CatalogServiceError> {
        self.find(|product| product.slug == slug)
    }

    async fn product_exists(&self, id: &ProductId) -> Result<bool, CatalogServiceError> {
        Ok(self.products.iter().any(|product| product.id == *id))
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, CatalogServiceError> {
        Ok(self.filter(|product| product.matches(query)))
    }

    async fn products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogServiceError> {
        let category = category.trim();

        Ok(self.filter(|product| product.category.eq_ignore_ascii_case(category)))
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves every product in the catalog.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Retrieve a single product by identifier.
    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogServiceError>;

    /// Retrieve a single product by its URL slug.
    async fn get_product_by_slug(&self, slug: &str) -> Result<Product, CatalogServiceError>;

    /// Whether a product with the identifier is still listed.
    async fn product_exists(&self, id: &ProductId) -> Result<bool, CatalogServiceError>;

    /// Products whose name contains `query`, ignoring case.
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, CatalogServiceError>;

    /// Products tagged with `category`.
    async fn products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use crate::test::helpers::rupees;

    use super::*;

    fn catalog() -> FixtureCatalogService {
        FixtureCatalogService::new(vec![
            Product::new("p-biryani", "Chicken Biryani", rupees(1_200)).with_category("rice"),
            Product::new("p-pulao", "Beef Pulao", rupees(1_100)).with_category("Rice"),
            Product::new("p-raita", "Mint Raita", rupees(150)),
        ])
    }

    #[tokio::test]
    async fn test_get_product_and_slug() -> TestResult {
        let catalog = catalog();

        let product = catalog.get_product(&ProductId::new("p-pulao")).await?;
        assert_eq!(product.name, "Beef Pulao");

        let product = catalog.get_product_by_slug("mint-raita").await?;
        assert_eq!(product.id, ProductId::new("p-raita"));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let result = catalog().get_product(&ProductId::new("p-gone")).await;

        assert!(matches!(result, Err(CatalogServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_product_exists() -> TestResult {
        let catalog = catalog();

        assert!(catalog.product_exists(&ProductId::new("p-biryani")).await?);
        assert!(!catalog.product_exists(&ProductId::new("p-gone")).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_search_and_category_ignore_case() -> TestResult {
        let catalog = catalog();

        let found = catalog.search_products("BIRYANI").await?;
        assert_eq!(found.len(), 1);

        let rice = catalog.products_by_category("rice").await?;
        assert_eq!(rice.len(), 2);

        assert_eq!(catalog.search_products("  ").await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_from_path_reads_yaml() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        writeln!(
            file,
            "products:\n  - id: p-kheer\n    name: Kheer\n    price: 300 PKR\n    discount: 5%"
        )?;

        let catalog = FixtureCatalogService::from_path(file.path()).await?;
        let products = catalog.list_products().await?;

        assert_eq!(products.len(), 1);
        assert_eq!(products.first().map(|p| p.name.as_str()), Some("Kheer"));

        Ok(())
    }

    #[tokio::test]
    async fn test_from_path_missing_file_is_io_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let result = FixtureCatalogService::from_path(dir.path().join("none.yml")).await;

        assert!(matches!(result, Err(CatalogServiceError::Io(_))));

        Ok(())
    }
}
