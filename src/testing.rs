//! Scripted in-memory Provider for unit tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::SyncError;
use crate::provider::{Operation, ProviderApi, ProviderRequest, ProviderResponse};
use crate::sources::SourceMapping;

#[derive(Default)]
pub(crate) struct FakeProvider {
    responses: Mutex<HashMap<Operation, VecDeque<Result<ProviderResponse, SyncError>>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl FakeProvider {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push(&self, operation: Operation, body: Value) {
        let envelope: ProviderResponse = serde_json::from_value(body).unwrap();
        self.push_result(operation, Ok(envelope));
    }

    pub(crate) fn push_result(&self, operation: Operation, result: Result<ProviderResponse, SyncError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(result);
    }

    pub(crate) fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self, operation: Operation) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.operation() == operation)
            .count()
    }
}

#[async_trait]
impl ProviderApi for FakeProvider {
    async fn send(&self, request: &ProviderRequest) -> Result<ProviderResponse, SyncError> {
        self.requests.lock().unwrap().push(request.clone());
        let operation = request.operation();
        self.responses
            .lock()
            .unwrap()
            .get_mut(&operation)
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| {
                Err(SyncError::Protocol {
                    operation: operation.as_str(),
                    message: "no scripted response".into(),
                })
            })
    }
}

pub(crate) fn mapping(pairs: &[(&str, &str)]) -> Arc<SourceMapping> {
    Arc::new(SourceMapping::new(
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
    ))
}

/// A SUCCESS envelope with orders whose ids run over `ids`.
pub(crate) fn orders_page(ids: impl IntoIterator<Item = u64>) -> Value {
    let orders: Vec<Value> = ids.into_iter().map(|i| json!({"order_id": i, "total": 100.0})).collect();
    json!({"status": "SUCCESS", "orders": orders})
}
