use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SyncError;
use crate::provider::{ProviderApi, RequestBuilder};
use crate::sources::SourceMapping;
use crate::types::Marketplace;

/// Confirms a marketplace is mapped locally and that its source id exists in the Provider.
#[derive(Clone)]
pub struct ConfigurationValidator {
    sources: Arc<SourceMapping>,
    provider: Arc<dyn ProviderApi>,
    requests: RequestBuilder,
}

impl ConfigurationValidator {
    pub fn new(sources: Arc<SourceMapping>, provider: Arc<dyn ProviderApi>) -> Self {
        let requests = RequestBuilder::new(sources.clone());
        Self {
            sources,
            provider,
            requests,
        }
    }

    pub async fn validate(&self, marketplace: Marketplace) -> Result<(), SyncError> {
        let source_id = self.sources.resolve(marketplace).ok_or_else(|| {
            SyncError::MarketplaceNotConfigured(format!(
                "Marketplace {} is not configured locally",
                marketplace
            ))
        })?;
        tracing::debug!(marketplace = %marketplace, source_id, "local configuration valid");

        let response = self.provider.send(&self.requests.order_sources_request()).await?;
        let sources = response.sources()?;

        if sources.is_empty() {
            return Err(SyncError::MarketplaceNotConfigured(
                "No order sources configured in Provider".into(),
            ));
        }

        let exists = sources
            .get(&marketplace.key())
            .map(|accounts| source_id_listed(accounts, source_id))
            .unwrap_or(false);

        if !exists {
            return Err(SyncError::MarketplaceNotConfigured(format!(
                "Marketplace {} is configured locally, but doesn't exist in Provider",
                marketplace
            )));
        }

        tracing::debug!(
            marketplace = %marketplace,
            source_id,
            total_sources = sources.len(),
            "Provider configuration valid"
        );
        Ok(())
    }
}

fn source_id_listed(accounts: &HashMap<String, String>, source_id: u64) -> bool {
    accounts
        .keys()
        .any(|id| id.trim().parse::<u64>().ok() == Some(source_id))
}
