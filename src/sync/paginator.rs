use std::sync::Arc;

use crate::error::SyncError;
use crate::provider::request::default_date_from;
use crate::provider::{ProviderApi, RequestBuilder};
use crate::types::{Marketplace, Order};

pub const PAGE_SIZE: usize = 100;

/// Walks the Provider's order list with an `id_from` cursor until a short page.
#[derive(Clone)]
pub struct OrderPaginator {
    provider: Arc<dyn ProviderApi>,
    requests: RequestBuilder,
    max_pages: Option<usize>,
}

impl OrderPaginator {
    pub fn new(provider: Arc<dyn ProviderApi>, requests: RequestBuilder) -> Self {
        Self {
            provider,
            requests,
            max_pages: None,
        }
    }

    /// `Some(0)` is treated like `None`: no ceiling.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages.filter(|max| *max > 0);
        self
    }

    pub async fn fetch_all(
        &self,
        marketplace: Marketplace,
        date_from: Option<i64>,
    ) -> Result<Vec<Order>, SyncError> {
        let date_from = date_from.unwrap_or_else(default_date_from);
        let mut out: Vec<Order> = vec![];
        let mut cursor: Option<u64> = None;
        let mut page: usize = 1;

        tracing::debug!(marketplace = %marketplace, date_from, "starting pagination");

        loop {
            if let Some(max) = self.max_pages {
                if page > max {
                    return Err(SyncError::PageLimitExceeded {
                        marketplace: marketplace.to_string(),
                        max_pages: max,
                    });
                }
            }

            let request = self.requests.orders_request(marketplace, Some(date_from), cursor)?;
            let orders = self.provider.send(&request).await?.orders()?;
            let count = orders.len();

            tracing::debug!(
                marketplace = %marketplace,
                page,
                count,
                id_from = ?cursor,
                "page fetched"
            );

            // Cursor is the last record as returned, not the max id.
            if let Some(last) = orders.last() {
                cursor = last.order_id();
                if cursor.is_none() {
                    tracing::warn!(
                        marketplace = %marketplace,
                        page,
                        "last order on page has no order_id; next page will be requested without id_from"
                    );
                }
            }
            out.extend(orders);

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        tracing::debug!(
            marketplace = %marketplace,
            total_orders = out.len(),
            total_pages = page,
            "pagination completed"
        );

        Ok(out)
    }
}
