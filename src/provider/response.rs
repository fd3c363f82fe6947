use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::SyncError;
use crate::types::{Order, OrderStatus};

use super::request::Operation;

/// lowercase marketplace name → (source id string → display name)
pub type OrderSources = HashMap<String, HashMap<String, String>>;

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<Value>::deserialize(deserializer)?;
    Ok(opt.and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }))
}

/// Response envelope shared by every Provider operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    #[serde(default, deserialize_with = "scalar_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    // Operation-specific keys: orders, sources, statuses, ...
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ProviderResponse {
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("ERROR")
    }

    pub fn orders(&self) -> Result<Vec<Order>, SyncError> {
        self.list("orders", Operation::GetOrders)
    }

    pub fn statuses(&self) -> Result<Vec<OrderStatus>, SyncError> {
        self.list("statuses", Operation::GetOrderStatusList)
    }

    pub fn sources(&self) -> Result<OrderSources, SyncError> {
        let mut out = OrderSources::new();
        match self.payload.get("sources") {
            None | Some(Value::Null) => {}
            // a list has index keys only, so no marketplace key ever matches it
            Some(Value::Array(items)) => {
                for (i, accounts) in items.iter().enumerate() {
                    out.insert(i.to_string(), source_accounts(accounts));
                }
            }
            Some(Value::Object(by_marketplace)) => {
                for (marketplace, accounts) in by_marketplace {
                    out.insert(marketplace.to_ascii_lowercase(), source_accounts(accounts));
                }
            }
            Some(other) => {
                return Err(SyncError::Protocol {
                    operation: Operation::GetOrderSources.as_str(),
                    message: format!("unexpected sources payload: {}", other),
                })
            }
        }
        Ok(out)
    }

    fn list<T>(&self, key: &str, operation: Operation) -> Result<Vec<T>, SyncError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.payload.get(key) {
            None | Some(Value::Null) => Ok(vec![]),
            Some(v) => serde_json::from_value(v.clone()).map_err(|e| SyncError::Protocol {
                operation: operation.as_str(),
                message: format!("decode {} failed: {}", key, e),
            }),
        }
    }
}

fn source_accounts(v: &Value) -> HashMap<String, String> {
    let display = |name: &Value| match name {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match v {
        Value::Object(m) => m.iter().map(|(id, name)| (id.clone(), display(name))).collect(),
        Value::Array(a) => a
            .iter()
            .enumerate()
            .map(|(i, name)| (i.to_string(), display(name)))
            .collect(),
        _ => HashMap::new(),
    }
}
