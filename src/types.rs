use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Marketplace {
    Allegro,
    Amazon,
    Personal,
}

impl Marketplace {
    pub const ALL: [Marketplace; 3] = [Marketplace::Allegro, Marketplace::Amazon, Marketplace::Personal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Marketplace::Allegro => "ALLEGRO",
            Marketplace::Amazon => "AMAZON",
            Marketplace::Personal => "PERSONAL",
        }
    }

    /// Lowercase name, used both for the local source mapping and the Provider's `sources` payload.
    pub fn key(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marketplace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Marketplace::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| {
                let available: Vec<&str> = Marketplace::ALL.iter().map(|m| m.as_str()).collect();
                format!("invalid marketplace: {} (available: {})", upper, available.join(", "))
            })
    }
}

/// Provider order record. Kept as the raw field bag; only the id is read, as the pagination cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order(pub Map<String, Value>);

impl Order {
    pub fn order_id(&self) -> Option<u64> {
        match self.0.get("order_id")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(pub Map<String, Value>);

/// Unit of asynchronous work: fetch and process orders for one marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTask {
    pub marketplace: Marketplace,
}

impl SyncTask {
    pub fn new(marketplace: Marketplace) -> Self {
        Self { marketplace }
    }
}
