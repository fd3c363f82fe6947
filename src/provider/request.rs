use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::SyncError;
use crate::sources::SourceMapping;
use crate::types::Marketplace;

const DEFAULT_LOOKBACK_SEC: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetOrders,
    GetOrderSources,
    GetOrderStatusList,
}

impl Operation {
    /// Method name as the Provider expects it on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetOrders => "getOrders",
            Operation::GetOrderSources => "getOrderSources",
            Operation::GetOrderStatusList => "getOrderStatusList",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    operation: Operation,
    parameters: Map<String, Value>,
}

impl ProviderRequest {
    pub fn new(operation: Operation, parameters: Map<String, Value>) -> Self {
        Self { operation, parameters }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    /// Parameters encoded as the single JSON string the Provider reads from the `parameters` field.
    pub fn parameters_json(&self) -> String {
        Value::Object(self.parameters.clone()).to_string()
    }
}

pub fn default_date_from() -> i64 {
    chrono::Utc::now().timestamp() - DEFAULT_LOOKBACK_SEC
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    sources: Arc<SourceMapping>,
}

impl RequestBuilder {
    pub fn new(sources: Arc<SourceMapping>) -> Self {
        Self { sources }
    }

    /// `id_from` is omitted entirely when absent; the Provider treats presence as a cursor.
    pub fn orders_request(
        &self,
        marketplace: Marketplace,
        date_from: Option<i64>,
        id_from: Option<u64>,
    ) -> Result<ProviderRequest, SyncError> {
        let source_id = self.sources.resolve(marketplace).ok_or_else(|| {
            SyncError::MarketplaceNotConfigured(format!(
                "Marketplace {} is not configured locally",
                marketplace
            ))
        })?;

        let mut params = Map::new();
        params.insert("order_source_id".into(), Value::from(source_id));
        params.insert(
            "date_confirmed_from".into(),
            Value::from(date_from.unwrap_or_else(default_date_from)),
        );
        if let Some(id) = id_from {
            params.insert("id_from".into(), Value::from(id));
        }

        Ok(ProviderRequest::new(Operation::GetOrders, params))
    }

    pub fn order_sources_request(&self) -> ProviderRequest {
        ProviderRequest::new(Operation::GetOrderSources, Map::new())
    }

    pub fn order_status_list_request(&self) -> ProviderRequest {
        ProviderRequest::new(Operation::GetOrderStatusList, Map::new())
    }
}
