//! Orders requests bounded by a timeout.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use storefront::orders::{NewOrder, Order, OrderNumber};
use tokio::time::timeout;

use crate::domain::orders::{errors::OrdersServiceError, service::OrdersService};

/// Wraps an orders store so every request fails with [`OrdersServiceError::Timeout`] once it
/// runs past the bound.
#[derive(Clone)]
pub struct TimedOrdersService {
    inner: Arc<dyn OrdersService>,
    request_timeout: Duration,
}

impl TimedOrdersService {
    #[must_use]
    pub fn new(inner: Arc<dyn OrdersService>, request_timeout: Duration) -> Self {
        Self {
            inner,
            request_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        request: impl Future<Output = Result<T, OrdersServiceError>>,
    ) -> Result<T, OrdersServiceError> {
        timeout(self.request_timeout, request)
            .await
            .map_err(|_elapsed| OrdersServiceError::Timeout(self.request_timeout))?
    }
}

#[async_trait]
impl OrdersService for TimedOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        self.bounded(self.inner.create_order(order)).await
    }

    async fn get_order(&self, number: &OrderNumber) -> Result<Order, OrdersServiceError> {
        self.bounded(self.inner.get_order(number)).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        self.bounded(self.inner.list_orders()).await
    }
}
