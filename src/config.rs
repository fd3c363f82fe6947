use serde::Deserialize;
use std::collections::HashMap;

use crate::sources::SourceMapping;
use crate::types::Marketplace;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub provider_api_url: String,
    pub provider_api_key: String,
    pub http_timeout_sec: u64,

    // Provider source ids per marketplace; unset or non-numeric means unmapped
    pub source_allegro: Option<String>,
    pub source_amazon: Option<String>,
    pub source_personal: Option<String>,

    pub sync_workers: usize,
    pub sync_queue_capacity: usize,

    // Pagination safety ceiling, unbounded when unset or 0
    pub max_pages: Option<usize>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let c = config::Config::builder()
            .set_default("http_timeout_sec", 30)?
            .set_default("sync_workers", 2)?
            .set_default("sync_queue_capacity", 16)?
            .add_source(config::Environment::default())
            .build()?;
        Ok(c.try_deserialize()?)
    }

    pub fn source_mapping(&self) -> SourceMapping {
        let mut raw: HashMap<String, String> = HashMap::new();
        for m in Marketplace::ALL {
            let value = match m {
                Marketplace::Allegro => &self.source_allegro,
                Marketplace::Amazon => &self.source_amazon,
                Marketplace::Personal => &self.source_personal,
            };
            if let Some(v) = value {
                raw.insert(m.key(), v.clone());
            }
        }
        SourceMapping::new(raw)
    }
}
