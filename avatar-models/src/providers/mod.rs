//! Generative provider trait and implementations.
//!
//! The [`GenerativeProvider`] trait is the seam between the annotator and the
//! network. Implementations return the raw status and body of each call so
//! that interpretation stays in one place, the pure classifiers in
//! [`crate::annotate`].
//!
//! # Example
//!
//! ```ignore
//! use avatar_models::providers::{GeminiClient, GenerativeProvider, TransportConfig};
//!
//! async fn list(key: &ApiKey) {
//!     let client = GeminiClient::new(TransportConfig::default())?;
//!     let response = client.list_models(key).await?;
//!     println!("{} {}", response.status, response.body);
//! }
//! ```

pub mod gemini;
mod types;

use async_trait::async_trait;

pub use gemini::{GeminiClient, TransportConfig};
pub use types::*;

use crate::Result;
use crate::auth::ApiKey;

/// Status and body of a provider call that reached the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ProviderResponse {
    /// Create a response from a status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is exactly 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Trait for generative model providers.
///
/// # Required Methods
///
/// - [`name`](GenerativeProvider::name) - Provider identifier used in logs
/// - [`list_models`](GenerativeProvider::list_models) - Metadata listing for a key
/// - [`generate`](GenerativeProvider::generate) - One generation call against one model
///
/// Transport failures are returned as [`crate::Error::Timeout`] or
/// [`crate::Error::Request`]. Any HTTP status, success or not, is returned as
/// a [`ProviderResponse`].
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Returns the provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// List the models the key can access.
    async fn list_models(&self, key: &ApiKey) -> Result<ProviderResponse>;

    /// Run one generation request against `model`.
    ///
    /// # Arguments
    ///
    /// * `model` - Model identifier without the `models/` prefix
    /// * `key` - Provider credential
    /// * `request` - Prompt and sampling parameters
    async fn generate(
        &self,
        model: &str,
        key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<ProviderResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A provider that answers every call with the same canned response.
    struct EchoProvider;

    #[async_trait]
    impl GenerativeProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn list_models(&self, _key: &ApiKey) -> Result<ProviderResponse> {
            Ok(ProviderResponse::new(200, r#"{"models": []}"#))
        }

        async fn generate(
            &self,
            model: &str,
            _key: &ApiKey,
            request: &GenerateContentRequest,
        ) -> Result<ProviderResponse> {
            let text = &request.contents[0].parts[0].text;
            Ok(ProviderResponse::new(200, format!("{model}:{text}")))
        }
    }

    #[tokio::test]
    async fn provider_generate_receives_model_and_prompt() {
        let provider = EchoProvider;
        let key = ApiKey::new("k");
        let request = GenerateContentRequest::single_prompt("hi", GenerationConfig::default());

        let response = provider.generate("m1", &key, &request).await.unwrap();
        assert!(response.is_ok());
        assert_eq!(response.body, "m1:hi");
    }

    #[test]
    fn response_is_ok_only_for_200() {
        assert!(ProviderResponse::new(200, "").is_ok());
        assert!(!ProviderResponse::new(201, "").is_ok());
        assert!(!ProviderResponse::new(404, "").is_ok());
    }

    #[tokio::test]
    async fn provider_lists_models() {
        let provider = EchoProvider;
        let response = provider.list_models(&ApiKey::new("k")).await.unwrap();
        assert_eq!(provider.name(), "echo");
        assert_eq!(response.status, 200);
    }
}
