pub mod client;
pub mod request;
pub mod response;

use async_trait::async_trait;

use crate::error::SyncError;

pub use client::ProviderClient;
pub use request::{Operation, ProviderRequest, RequestBuilder};
pub use response::ProviderResponse;

/// Abstraction over the order-management Provider.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    /// Send one remote operation and return the decoded envelope when its status is not ERROR.
    async fn send(&self, request: &ProviderRequest) -> Result<ProviderResponse, SyncError>;
}
