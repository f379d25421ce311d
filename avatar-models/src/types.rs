//! Core types for model discovery.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Speed tier of a generative model, derived from its identifier.
///
/// The derived `Ord` is the attempt order: fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelCategory {
    /// `*-flash-lite*` models.
    FlashLite,
    /// `*-flash*` models.
    Flash,
    /// `*-pro*` models.
    Pro,
    /// Anything else that can generate content.
    Other,
}

impl ModelCategory {
    /// Classify a model identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use avatar_models::ModelCategory;
    ///
    /// assert_eq!(ModelCategory::classify("gemini-2.0-flash-lite"), ModelCategory::FlashLite);
    /// assert_eq!(ModelCategory::classify("gemini-2.5-flash"), ModelCategory::Flash);
    /// assert_eq!(ModelCategory::classify("gemini-2.5-pro"), ModelCategory::Pro);
    /// assert_eq!(ModelCategory::classify("gemma-3-27b-it"), ModelCategory::Other);
    /// ```
    pub fn classify(id: &str) -> Self {
        if id.contains("flash") && id.contains("lite") {
            Self::FlashLite
        } else if id.contains("flash") {
            Self::Flash
        } else if id.contains("pro") {
            Self::Pro
        } else {
            Self::Other
        }
    }

    /// Short label for tables and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlashLite => "flash-lite",
            Self::Flash => "flash",
            Self::Pro => "pro",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model the credential can see, as reported by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Identifier without the provider's `models/` prefix.
    pub id: String,
    /// Whether the model accepts `generateContent`.
    pub supports_generation: bool,
    /// Speed tier used for ordering.
    pub category: ModelCategory,
}

impl ModelDescriptor {
    /// Build a descriptor from the provider's model name and method list.
    pub fn from_remote(name: &str, methods: &[String]) -> Self {
        let id = name.strip_prefix("models/").unwrap_or(name).to_string();
        Self {
            category: ModelCategory::classify(&id),
            supports_generation: methods.iter().any(|m| m == "generateContent"),
            id,
        }
    }
}
