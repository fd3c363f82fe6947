use async_trait::async_trait;
use std::time::Duration;

use crate::error::SyncError;

use super::request::ProviderRequest;
use super::response::ProviderResponse;
use super::ProviderApi;

const API_TOKEN_HEADER: &str = "X-API-TOKEN";

/// HTTP client for the Provider's single POST endpoint.
#[derive(Clone)]
pub struct ProviderClient {
    api_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        tracing::debug!(api_url = %api_url, api_key_len = api_key.len(), "ProviderClient initialized");
        Ok(Self {
            api_url,
            api_key: api_key.trim().to_string(),
            http,
        })
    }

    async fn call(&self, request: &ProviderRequest) -> Result<ProviderResponse, SyncError> {
        let operation = request.operation().as_str();
        let parameters = request.parameters_json();

        let resp = self
            .http
            .post(&self.api_url)
            .header(API_TOKEN_HEADER, &self.api_key)
            .form(&[("method", operation), ("parameters", parameters.as_str())])
            .send()
            .await
            .map_err(|source| SyncError::Transport { operation, source })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|source| SyncError::Transport { operation, source })?;

        if !status.is_success() {
            let snippet: String = body.chars().take(512).collect();
            return Err(SyncError::Protocol {
                operation,
                message: format!("non-2xx: status={} body_snippet={}", status, snippet),
            });
        }

        let envelope: ProviderResponse = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                let snippet: String = body.chars().take(2048).collect();
                return Err(SyncError::Protocol {
                    operation,
                    message: format!("decode json failed: {} body_snippet={}", e, snippet),
                });
            }
        };

        tracing::debug!(operation, response = ?envelope, "provider response");

        if envelope.is_error() {
            tracing::error!(
                operation,
                parameters = %parameters,
                response = ?envelope,
                "provider returned ERROR"
            );
            return Err(SyncError::Provider {
                operation,
                code: envelope.error_code.clone().unwrap_or_default(),
                message: envelope.error_message.clone().unwrap_or_default(),
            });
        }

        Ok(envelope)
    }
}

#[async_trait]
impl ProviderApi for ProviderClient {
    async fn send(&self, request: &ProviderRequest) -> Result<ProviderResponse, SyncError> {
        let operation = request.operation().as_str();
        tracing::info!(operation, parameters = %request.parameters_json(), "provider call");

        let result = self.call(request).await;
        match &result {
            Err(e) if !already_logged(e) => tracing::error!(
                operation,
                parameters = %request.parameters_json(),
                error = %e,
                "provider call failed"
            ),
            _ => {}
        }
        result
    }
}

// Provider-level ERROR envelopes are logged with the full response inside `call`.
fn already_logged(e: &SyncError) -> bool {
    matches!(e, SyncError::Provider { .. })
}
