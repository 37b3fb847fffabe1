//! Checkout submission: verifies the captured lines against the catalog and persists the
//! order.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use storefront::{
    cart::CartStore,
    checkout::{Checkout, CheckoutError, CheckoutFailure},
    orders::{NewOrder, Order},
    pricing::PricingEngine,
    storage::Storage,
};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::domain::{
    catalog::{CatalogService, CatalogServiceError},
    orders::{OrdersService, OrdersServiceError},
};

/// Default bound on each catalog or orders request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct CheckoutService {
    catalog: Arc<dyn CatalogService>,
    orders: Arc<dyn OrdersService>,
    engine: PricingEngine,
    request_timeout: Duration,
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        orders: Arc<dyn OrdersService>,
        engine: PricingEngine,
    ) -> Self {
        Self {
            catalog,
            orders,
            engine,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    #[must_use]
    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Submit the cart as an order.
    ///
    /// On success the cart is cleared and `checkout` holds the order number. On failure the
    /// form is kept and `checkout` records why, so the customer can submit again.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::SubmissionInFlight`]: `checkout` is already submitting.
    /// - [`CheckoutError::Failed`]: the cart is empty, the form is invalid, a product is no
    ///   longer listed, a request timed out or the order could not be persisted.
    /// - [`CheckoutError::Pricing`]: the cart could not be priced.
    #[tracing::instrument(
        name = "checkout.service.submit",
        skip_all,
        fields(lines = cart.len(), order_number = tracing::field::Empty),
        err
    )]
    pub async fn submit<S: Storage>(
        &self,
        checkout: &mut Checkout,
        cart: &mut CartStore<S>,
    ) -> Result<Order, CheckoutError> {
        let draft = checkout
            .begin_submission(cart.items(), &self.engine, Timestamp::now())
            .inspect_err(|error| warn!(%error, "checkout rejected before submission"))?;

        let order = match self.place(draft).await {
            Ok(order) => order,
            Err(failure) => {
                warn!(%failure, "checkout submission failed");
                checkout.fail(failure.clone())?;
                return Err(failure.into());
            }
        };

        tracing::Span::current().record("order_number", tracing::field::display(&order.number));

        checkout.complete(order.number.clone())?;

        // The order is placed; a stale cart must not turn that into a failure.
        if let Err(error) = cart.clear() {
            warn!(%error, order_number = %order.number, "failed to clear cart after checkout");
        }

        info!(order_number = %order.number, "checkout succeeded");

        Ok(order)
    }

    async fn place(&self, draft: NewOrder) -> Result<Order, CheckoutFailure> {
        let mut checked = FxHashSet::default();

        for line in &draft.lines {
            if !checked.insert(&line.product) {
                continue;
            }

            let exists = timeout(self.request_timeout, self.catalog.product_exists(&line.product))
                .await
                .map_err(|_elapsed| CheckoutFailure::Timeout)?
                .map_err(|error| match error {
                    CatalogServiceError::Timeout(_) => CheckoutFailure::Timeout,
                    error => CheckoutFailure::Persistence(error.to_string()),
                })?;

            if !exists {
                return Err(CheckoutFailure::ProductNotFound(line.product.clone()));
            }
        }

        timeout(self.request_timeout, self.orders.create_order(draft))
            .await
            .map_err(|_elapsed| CheckoutFailure::Timeout)?
            .map_err(|error| match error {
                OrdersServiceError::Timeout(_) => CheckoutFailure::Timeout,
                error => CheckoutFailure::Persistence(error.to_string()),
            })
    }
}
