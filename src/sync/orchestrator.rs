use std::sync::Arc;

use crate::error::SyncError;
use crate::types::{Marketplace, SyncTask};

use super::queue::TaskDispatcher;
use super::validator::ConfigurationValidator;

/// Synchronous entry point: validate, then hand a sync task to the dispatcher.
pub struct SyncOrchestrator {
    validator: ConfigurationValidator,
    dispatcher: Arc<dyn TaskDispatcher>,
}

impl SyncOrchestrator {
    pub fn new(validator: ConfigurationValidator, dispatcher: Arc<dyn TaskDispatcher>) -> Self {
        Self {
            validator,
            dispatcher,
        }
    }

    pub async fn validate_and_dispatch(&self, marketplace: Marketplace) -> Result<(), SyncError> {
        tracing::info!(marketplace = %marketplace, "validating marketplace configuration");

        self.validator.validate(marketplace).await?;
        self.dispatcher.dispatch(SyncTask::new(marketplace)).await?;

        tracing::info!(marketplace = %marketplace, "sync task dispatched");
        Ok(())
    }
}
