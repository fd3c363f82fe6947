use async_trait::async_trait;

use crate::error::SyncError;
use crate::types::{Marketplace, Order, OrderStatus};

/// Downstream handling of fetched orders.
#[async_trait]
pub trait OrderProcessor: Send + Sync {
    async fn process(
        &self,
        orders: &[Order],
        statuses: &[OrderStatus],
        marketplace: Marketplace,
    ) -> Result<(), SyncError>;
}

/// Logs what it receives and nothing else.
#[derive(Clone, Default)]
pub struct LoggingOrderProcessor;

impl LoggingOrderProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrderProcessor for LoggingOrderProcessor {
    async fn process(
        &self,
        orders: &[Order],
        statuses: &[OrderStatus],
        marketplace: Marketplace,
    ) -> Result<(), SyncError> {
        tracing::info!(
            marketplace = %marketplace,
            orders_count = orders.len(),
            statuses_count = statuses.len(),
            "processing orders"
        );
        for o in orders {
            tracing::debug!(marketplace = %marketplace, order_id = ?o.order_id(), "order");
        }
        Ok(())
    }
}
