//! App Context

use std::{path::PathBuf, sync::Arc, time::Duration};

use rusty_money::iso::Currency;
use storefront::{
    branding::{Brand, BrandError},
    cart::{CartError, CartStore},
    checkout::Checkout,
    pricing::PricingEngine,
    storage::FileStorage,
    wishlist::{WishlistError, WishlistStore},
};
use thiserror::Error;

use crate::{
    checkout::{CheckoutService, DEFAULT_REQUEST_TIMEOUT},
    config::AppConfig,
    domain::{
        catalog::{CatalogService, CatalogServiceError, FixtureCatalogService, TimedCatalogService},
        orders::{FileOrdersService, OrdersService, TimedOrdersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("invalid brand configuration")]
    Brand(#[from] BrandError),

    #[error("failed to load catalog")]
    Catalog(#[from] CatalogServiceError),

    #[error("catalog is priced in {catalog} but the brand sells in {brand}")]
    CurrencyMismatch {
        brand: &'static str,
        catalog: &'static str,
    },
}

#[derive(Clone)]
pub struct AppContext {
    pub brand: Brand,
    pub catalog: Arc<dyn CatalogService>,
    pub orders: Arc<dyn OrdersService>,
    currency: &'static Currency,
    engine: PricingEngine,
    data_dir: PathBuf,
    request_timeout: Duration,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the brand or catalog cannot be loaded, or when the catalog is
    /// priced in a different currency from the brand.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let brand = config.brand()?;
        let catalog = FixtureCatalogService::from_path(&config.catalog).await?;

        let currency = brand.currency()?;

        if let Some(product) = catalog.list_products().await?.first() {
            let priced_in = product.price.currency();

            if priced_in != currency {
                return Err(AppInitError::CurrencyMismatch {
                    brand: currency.iso_alpha_code,
                    catalog: priced_in.iso_alpha_code,
                });
            }
        }

        let request_timeout = config.request_timeout();

        // Every catalog and orders request made through the context is bounded.
        Ok(Self::new(
            brand,
            Arc::new(TimedCatalogService::new(Arc::new(catalog), request_timeout)),
            Arc::new(TimedOrdersService::new(
                Arc::new(FileOrdersService::new(config.orders_dir())),
                request_timeout,
            )),
            config.data_dir.clone(),
        )?
        .with_request_timeout(request_timeout))
    }

    /// Build application context from already constructed services.
    ///
    /// # Errors
    ///
    /// Returns an error if the brand currency is unknown.
    pub fn new(
        brand: Brand,
        catalog: Arc<dyn CatalogService>,
        orders: Arc<dyn OrdersService>,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self, AppInitError> {
        let currency = brand.currency()?;

        Ok(Self {
            brand,
            catalog,
            orders,
            currency,
            engine: PricingEngine::standard(currency),
            data_dir: data_dir.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    #[must_use]
    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }

    /// Load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read.
    pub fn cart(&self) -> Result<CartStore<FileStorage>, CartError> {
        CartStore::load(self.storage(), self.currency)
    }

    /// Load the persisted wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored wishlist cannot be read.
    pub fn wishlist(&self) -> Result<WishlistStore<FileStorage>, WishlistError> {
        WishlistStore::load(self.storage())
    }

    /// A fresh checkout form preset to the brand's country.
    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.brand.default_country.clone())
    }

    #[must_use]
    pub fn checkout_service(&self) -> CheckoutService {
        CheckoutService::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.orders),
            self.engine.clone(),
        )
        .with_request_timeout(self.request_timeout)
    }
}
