//! Model listing filter and attempt ordering.

use crate::providers::ListModelsResponse;
use crate::types::ModelDescriptor;

/// Identifier fragments of models that cannot annotate text.
pub const EXCLUDED_FRAGMENTS: &[&str] = &[
    "image",
    "embed",
    "aqa",
    "retrieval",
    "robotics",
    "computer-use",
    "deep-research",
];

/// Whether a descriptor can serve an annotation request.
pub fn is_usable(model: &ModelDescriptor) -> bool {
    model.supports_generation
        && !EXCLUDED_FRAGMENTS
            .iter()
            .any(|fragment| model.id.contains(fragment))
}

/// Usable models in the order the provider listed them.
pub fn usable_models(listing: &ListModelsResponse) -> Vec<ModelDescriptor> {
    listing
        .models
        .iter()
        .map(|m| ModelDescriptor::from_remote(&m.name, &m.supported_generation_methods))
        .filter(is_usable)
        .collect()
}

/// Sort into attempt order, fastest category first.
///
/// `sort_by_key` is stable, so models within a category keep the provider's
/// relative order.
pub fn prioritize(models: &mut [ModelDescriptor]) {
    models.sort_by_key(|m| m.category);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(json: &str) -> ListModelsResponse {
        serde_json::from_str(json).unwrap()
    }

    fn ids(models: &[ModelDescriptor]) -> Vec<&str> {
        models.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn filters_non_generation_and_excluded_models() {
        let resp = listing(
            r#"{"models": [
                {"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/gemini-2.0-flash-preview-image-generation", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"]},
                {"name": "models/gemini-embedding-exp", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/aqa", "supportedGenerationMethods": ["generateAnswer", "generateContent"]},
                {"name": "models/gemini-robotics-er-1.5-preview", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/gemini-2.5-computer-use-preview", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/deep-research-pro-preview", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/gemma-3-27b-it", "supportedGenerationMethods": ["generateContent", "countTokens"]}
            ]}"#,
        );

        let models = usable_models(&resp);
        assert_eq!(ids(&models), vec!["gemini-2.5-flash", "gemma-3-27b-it"]);
    }

    #[test]
    fn prioritize_orders_by_category() {
        let resp = listing(
            r#"{"models": [
                {"name": "models/gemini-2.5-pro", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/gemini-2.5-flash-lite", "supportedGenerationMethods": ["generateContent"]}
            ]}"#,
        );

        let mut models = usable_models(&resp);
        prioritize(&mut models);
        assert_eq!(
            ids(&models),
            vec!["gemini-2.5-flash-lite", "gemini-2.5-flash", "gemini-2.5-pro"]
        );
    }

    #[test]
    fn prioritize_is_stable_within_category() {
        let resp = listing(
            r#"{"models": [
                {"name": "models/gemma-3-4b-it", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/gemma-3-1b-it", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/gemini-2.0-flash", "supportedGenerationMethods": ["generateContent"]}
            ]}"#,
        );

        let mut models = usable_models(&resp);
        prioritize(&mut models);
        assert_eq!(
            ids(&models),
            vec![
                "gemini-2.5-flash",
                "gemini-2.0-flash",
                "gemma-3-4b-it",
                "gemma-3-1b-it"
            ]
        );
    }

    #[test]
    fn empty_listing_has_no_usable_models() {
        assert!(usable_models(&listing("{}")).is_empty());
    }
}
