use std::sync::Arc;

use crate::error::SyncError;
use crate::perf::PerformanceLogger;
use crate::provider::{ProviderApi, RequestBuilder};
use crate::sources::SourceMapping;
use crate::types::{OrderStatus, SyncTask};

use super::paginator::OrderPaginator;
use super::processing::OrderProcessor;

/// Body of one sync task: fetch orders, fetch statuses, hand both to the processor.
#[derive(Clone)]
pub struct FetchProcessor {
    paginator: OrderPaginator,
    provider: Arc<dyn ProviderApi>,
    requests: RequestBuilder,
    processor: Arc<dyn OrderProcessor>,
    perf: PerformanceLogger,
}

impl FetchProcessor {
    pub fn new(
        provider: Arc<dyn ProviderApi>,
        sources: Arc<SourceMapping>,
        processor: Arc<dyn OrderProcessor>,
    ) -> Self {
        let requests = RequestBuilder::new(sources);
        Self {
            paginator: OrderPaginator::new(provider.clone(), requests.clone()),
            provider,
            requests,
            processor,
            perf: PerformanceLogger::new(),
        }
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.paginator = self.paginator.with_max_pages(max_pages);
        self
    }

    /// Returns the number of orders processed. Errors are left to the caller.
    pub async fn handle(&self, task: SyncTask) -> Result<usize, SyncError> {
        let marketplace = task.marketplace;
        tracing::info!(marketplace = %marketplace, "starting order synchronization");

        let orders = self
            .perf
            .measure("fetch_marketplace_data", || self.paginator.fetch_all(marketplace, None))
            .await?;

        if orders.is_empty() {
            tracing::info!(marketplace = %marketplace, "no orders to synchronize");
            return Ok(0);
        }

        let statuses = self
            .perf
            .measure("fetch_order_statuses", || self.fetch_order_statuses())
            .await?;

        self.processor.process(&orders, &statuses, marketplace).await?;

        tracing::info!(
            marketplace = %marketplace,
            orders_processed = orders.len(),
            "order synchronization completed"
        );
        Ok(orders.len())
    }

    async fn fetch_order_statuses(&self) -> Result<Vec<OrderStatus>, SyncError> {
        let statuses = self
            .provider
            .send(&self.requests.order_status_list_request())
            .await?
            .statuses()?;
        tracing::debug!(count = statuses.len(), "order statuses fetched");
        Ok(statuses)
    }
}
