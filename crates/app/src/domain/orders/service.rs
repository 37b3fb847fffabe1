//! Orders service.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use mockall::automock;
use storefront::orders::{NewOrder, Order, OrderNumber};
use tokio::{fs, io::AsyncWriteExt};
use tracing::info;
use uuid::Uuid;

use crate::domain::orders::errors::OrdersServiceError;

/// Orders stored as one JSON document per order under a directory.
#[derive(Debug, Clone)]
pub struct FileOrdersService {
    dir: PathBuf,
}

impl FileOrdersService {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, number: &OrderNumber) -> PathBuf {
        self.dir.join(format!("{number}.json"))
    }

    fn next_number() -> Result<OrderNumber, OrdersServiceError> {
        OrderNumber::new(format!("ORD-{}", Uuid::now_v7())).map_err(Into::into)
    }
}

#[async_trait]
impl OrdersService for FileOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(lines = order.lines.len(), order_number = tracing::field::Empty),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(OrdersServiceError::Io)?;

        let order = Order::place(Self::next_number()?, order);

        tracing::Span::current().record(
            "order_number",
            tracing::field::display(&order.number),
        );

        let document = serde_json::to_vec_pretty(&order)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_for(&order.number))
            .await?;

        file.write_all(&document).await?;
        file.flush().await?;

        info!(order_number = %order.number, total = %order.totals.total, "created order");

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self, number),
        fields(order_number = %number),
        err
    )]
    async fn get_order(&self, number: &OrderNumber) -> Result<Order, OrdersServiceError> {
        let document = fs::read(self.path_for(number)).await?;

        Ok(serde_json::from_slice(&document)?)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(OrdersServiceError::Io(error)),
        };

        let mut orders = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(OrdersServiceError::Io)? {
            let path = entry.path();

            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let document = fs::read(&path).await?;

            orders.push(serde_json::from_slice::<Order>(&document)?);
        }

        orders.sort_by(|a, b| {
            a.placed_at
                .cmp(&b.placed_at)
                .then_with(|| a.number.as_str().cmp(b.number.as_str()))
        });

        Ok(orders)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Persists a new order and assigns its number.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Retrieve a placed order.
    async fn get_order(&self, number: &OrderNumber) -> Result<Order, OrdersServiceError>;

    /// Retrieves every placed order, oldest first.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;
}
