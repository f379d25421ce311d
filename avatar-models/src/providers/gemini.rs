//! Google Generative Language API provider.
//!
//! Talks to `generativelanguage.googleapis.com/v1beta` (or any compatible
//! base URL) over `reqwest`.
//!
//! # Example
//!
//! ```ignore
//! use avatar_models::providers::{GeminiClient, TransportConfig};
//!
//! let client = GeminiClient::new(TransportConfig::default())?;
//! let client = GeminiClient::new(TransportConfig::with_base_url("http://127.0.0.1:9000/v1beta"))?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{GenerateContentRequest, GenerativeProvider, ProviderResponse};
use crate::auth::ApiKey;
use crate::{Error, Result};

/// Default Generative Language API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Budget for the model listing call.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Budget for each generation call.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound transport settings for the provider client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Timeout for `GET /models`.
    pub discovery_timeout: Duration,
    /// Timeout for each `:generateContent` call.
    pub generation_timeout: Duration,
    /// Accept invalid TLS certificates (for intercepting proxies).
    ///
    /// Applies to this client only.
    pub insecure_transport: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            discovery_timeout: DISCOVERY_TIMEOUT,
            generation_timeout: GENERATION_TIMEOUT,
            insecure_transport: false,
        }
    }
}

impl TransportConfig {
    /// Default settings pointed at a different base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Enable or disable certificate validation bypass.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure_transport = insecure;
        self
    }
}

/// Gemini provider over HTTP.
pub struct GeminiClient {
    config: TransportConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Build a client from transport settings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Request` if the underlying HTTP client cannot be built.
    pub fn new(config: TransportConfig) -> Result<Self> {
        if config.insecure_transport {
            warn!("TLS certificate validation is disabled for the provider client");
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_transport)
            .build()
            .map_err(|e| Error::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn read(response: reqwest::Response, budget: Duration) -> Result<ProviderResponse> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_transport(e, budget))?;
        Ok(ProviderResponse { status, body })
    }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn list_models(&self, key: &ApiKey) -> Result<ProviderResponse> {
        let url = format!("{}/models", self.base_url());
        let budget = self.config.discovery_timeout;
        debug!(%url, "listing provider models");

        let response = self
            .client
            .get(&url)
            .query(&[("key", key.expose_secret())])
            .timeout(budget)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, budget))?;

        Self::read(response, budget).await
    }

    async fn generate(
        &self,
        model: &str,
        key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<ProviderResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url(), model);
        let budget = self.config.generation_timeout;
        debug!(%url, "generating content");

        let response = self
            .client
            .post(&url)
            .query(&[("key", key.expose_secret())])
            .json(request)
            .timeout(budget)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, budget))?;

        Self::read(response, budget).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_secure() {
        let config = TransportConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.discovery_timeout, Duration::from_secs(15));
        assert_eq!(config.generation_timeout, Duration::from_secs(30));
        assert!(!config.insecure_transport);
    }

    #[test]
    fn with_base_url_keeps_defaults() {
        let config = TransportConfig::with_base_url("http://127.0.0.1:9000/v1beta").insecure(true);
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1beta");
        assert_eq!(config.generation_timeout, GENERATION_TIMEOUT);
        assert!(config.insecure_transport);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = GeminiClient::new(TransportConfig::with_base_url("http://localhost:1/v1beta/"))
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:1/v1beta");
        assert_eq!(client.name(), "gemini");
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_request_error() {
        // Port 1 on localhost is never listening
        let client =
            GeminiClient::new(TransportConfig::with_base_url("http://127.0.0.1:1/v1beta")).unwrap();
        let result = client.list_models(&ApiKey::new("k")).await;
        assert!(matches!(result, Err(Error::Request(_))));
    }

    #[tokio::test]
    async fn unreachable_provider_never_reveals_key() {
        let secret = "AIzaSySecretKeyNeverShown123";
        let client =
            GeminiClient::new(TransportConfig::with_base_url("http://127.0.0.1:1/v1beta")).unwrap();
        let annotator = crate::Annotator::new(std::sync::Arc::new(client));
        let key = ApiKey::new(secret);

        let diagnostic = annotator.annotate("Hola", Some(&key)).await.unwrap_err();
        assert_eq!(diagnostic.category, crate::DiagnosticCategory::DiscoveryFailed);
        assert!(!diagnostic.message.contains(secret));
        assert!(!diagnostic.to_string().contains(secret));

        let diagnostic = annotator.list_available_models(Some(&key)).await.unwrap_err();
        assert!(!diagnostic.message.contains(secret));
    }
}
