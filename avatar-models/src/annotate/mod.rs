//! Emotion annotation with model discovery and fallback.
//!
//! One call to [`Annotator::annotate`] runs, strictly in sequence:
//!
//! 1. **Discovery** - list the models the key can use and drop the ones that
//!    cannot annotate text (see [`discovery`])
//! 2. **Ordering** - stable sort by [`ModelCategory`](crate::ModelCategory),
//!    flash-lite first
//! 3. **Fallback** - try each model in turn; a model that is unavailable is
//!    skipped, anything else ends the request
//!
//! Nothing is cached between calls, so two identical requests may be served
//! by different models if availability changed in between.
//!
//! Failures never escape as [`crate::Error`]: they are turned into a
//! [`Diagnostic`] at this boundary.

pub mod diagnostic;
pub mod discovery;
pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use diagnostic::{Diagnostic, DiagnosticCategory, classify_failure, is_model_unavailable};

use crate::auth::ApiKey;
use crate::providers::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, GenerativeProvider,
    ListModelsResponse, ProviderResponse,
};
use crate::types::ModelDescriptor;

/// Annotated text and the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub model: String,
}

/// What one generation attempt means for the fallback loop.
#[derive(Debug)]
enum Attempt {
    Accepted(String),
    Skipped,
    Stopped(Diagnostic),
}

/// The annotation service.
///
/// Holds only immutable configuration and the provider handle, so one
/// instance can serve concurrent requests.
pub struct Annotator {
    provider: Arc<dyn GenerativeProvider>,
    generation: GenerationConfig,
}

impl Annotator {
    /// Create an annotator with default sampling parameters.
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            provider,
            generation: GenerationConfig::default(),
        }
    }

    /// Override temperature and output length.
    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Annotate `text` with emotion markers.
    ///
    /// Input is validated before any network access: blank text yields
    /// [`DiagnosticCategory::BadInput`] and a missing or blank key yields
    /// [`DiagnosticCategory::NoCredential`].
    pub async fn annotate(
        &self,
        text: &str,
        key: Option<&ApiKey>,
    ) -> Result<Annotation, Diagnostic> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Diagnostic::empty_text());
        }
        let key = require_key(key)?;

        let mut models = self.discover(key).await?;
        if models.is_empty() {
            warn!("No usable models for this key");
            return Err(Diagnostic::all_models_exhausted(0));
        }
        discovery::prioritize(&mut models);

        let request = GenerateContentRequest::single_prompt(prompt::build_prompt(text), self.generation);

        for model in &models {
            let response = match self.provider.generate(&model.id, key, &request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(model = %model.id, error = %e, "Generation call failed");
                    return Err(Diagnostic::from_error(&e));
                }
            };

            match judge(&model.id, &response) {
                Attempt::Accepted(annotated) => {
                    info!(model = %model.id, chars = annotated.chars().count(), "Annotation accepted");
                    return Ok(Annotation {
                        text: annotated,
                        model: model.id.clone(),
                    });
                }
                Attempt::Skipped => {
                    warn!(model = %model.id, status = response.status, "Model unavailable, trying next");
                }
                Attempt::Stopped(diagnostic) => {
                    warn!(
                        model = %model.id,
                        status = response.status,
                        category = %diagnostic.category,
                        "Annotation failed"
                    );
                    return Err(diagnostic);
                }
            }
        }

        warn!(tried = models.len(), "All models unavailable");
        Err(Diagnostic::all_models_exhausted(models.len()))
    }

    /// Usable models for `key`, in the order the provider lists them.
    ///
    /// Runs discovery only. An empty list is a successful result here.
    pub async fn list_available_models(
        &self,
        key: Option<&ApiKey>,
    ) -> Result<Vec<ModelDescriptor>, Diagnostic> {
        let key = require_key(key)?;
        self.discover(key).await
    }

    async fn discover(&self, key: &ApiKey) -> Result<Vec<ModelDescriptor>, Diagnostic> {
        let response = self.provider.list_models(key).await.map_err(|e| {
            warn!(error = %e, "Model discovery failed");
            match e {
                crate::Error::Timeout(budget) => Diagnostic::timeout(budget),
                other => Diagnostic::discovery_failed(None, &other.to_string()),
            }
        })?;

        if !response.is_ok() {
            warn!(status = response.status, "Model discovery rejected");
            return Err(Diagnostic::discovery_failed(
                Some(response.status),
                &diagnostic::provider_detail(&response.body),
            ));
        }

        let listing: ListModelsResponse = serde_json::from_str(&response.body).map_err(|e| {
            warn!(error = %e, "Unreadable model listing");
            Diagnostic::discovery_failed(None, &format!("respuesta ilegible: {e}"))
        })?;

        let models = discovery::usable_models(&listing);
        let preview: Vec<&str> = models.iter().take(5).map(|m| m.id.as_str()).collect();
        info!(
            provider = self.provider.name(),
            count = models.len(),
            first = ?preview,
            "Discovered usable models"
        );
        Ok(models)
    }
}

fn require_key(key: Option<&ApiKey>) -> Result<&ApiKey, Diagnostic> {
    match key {
        Some(key) if !key.is_blank() => Ok(key),
        _ => Err(Diagnostic::no_credential()),
    }
}

fn judge(model: &str, response: &ProviderResponse) -> Attempt {
    if response.is_ok() {
        return match extract_text(&response.body) {
            Ok(text) => Attempt::Accepted(text),
            Err(diagnostic) => Attempt::Stopped(diagnostic),
        };
    }

    if is_model_unavailable(response.status, &response.body, model) {
        debug!(model, body = %response.body, "Skipping model");
        Attempt::Skipped
    } else {
        Attempt::Stopped(classify_failure(response.status, &response.body))
    }
}

fn extract_text(body: &str) -> Result<String, Diagnostic> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(Diagnostic::unexpected)?;
    parsed
        .first_text()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| Diagnostic::unexpected("la respuesta de Gemini no contiene texto"))
}
