//! Credential management for API keys.
//!
//! Provides secure storage of API keys using the system keyring with
//! environment variable fallback for `.env`-driven setups.
//!
//! # Example
//!
//! ```ignore
//! use avatar_models::auth::CredentialStore;
//!
//! let store = CredentialStore::new("avatar").with_env_fallback();
//!
//! // Store a key in the system keyring
//! store.set("google", "AIza...")?;
//!
//! // Retrieve it (checks keyring first, then env vars)
//! let key = store.get("google")?;
//! ```

use std::env;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{Error, Result};

/// Provider name the annotation service stores its key under.
pub const GOOGLE_PROVIDER: &str = "google";

/// A secure API key that prevents accidental logging.
///
/// The key is wrapped in `SecretString` which:
/// - Implements `Debug` as `"[REDACTED]"`
/// - Zeroizes memory on drop
/// - Requires explicit `.expose_secret()` to access the value
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Create a new API key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Expose the secret key value.
    ///
    /// Use sparingly - only when actually sending to an API.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whether the key is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.expose_secret().trim().is_empty()
    }

    /// Short, loggable form of the key: first 8 and last 4 characters.
    pub fn preview(&self) -> String {
        let chars: Vec<char> = self.expose_secret().trim().chars().collect();
        if chars.len() <= 12 {
            return "***".to_string();
        }
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Environment variable names for each provider, in lookup order.
///
/// `Google-API-KEY` is the name older `.env` files used.
const ENV_VARS: &[(&str, &[&str])] = &[(GOOGLE_PROVIDER, &["GOOGLE_API_KEY", "Google-API-KEY"])];

/// Get the environment variable names for a provider.
pub fn env_vars_for_provider(provider: &str) -> &'static [&'static str] {
    ENV_VARS
        .iter()
        .find(|(p, _)| *p == provider)
        .map(|(_, v)| *v)
        .unwrap_or(&[])
}

/// Anything that can hand out the provider key at request time.
///
/// The server resolves the key per request through this trait and passes it
/// to the annotator explicitly.
pub trait KeySource: Send + Sync {
    /// The current key, or `None` when nothing is configured.
    fn api_key(&self) -> Option<ApiKey>;
}

/// A fixed key (or fixed absence of one).
#[derive(Debug, Clone, Default)]
pub struct StaticKey(Option<ApiKey>);

impl StaticKey {
    /// A source that always returns `key`.
    pub fn new(key: impl Into<ApiKey>) -> Self {
        Self(Some(key.into()))
    }

    /// A source that never has a key.
    pub fn none() -> Self {
        Self(None)
    }
}

impl KeySource for StaticKey {
    fn api_key(&self) -> Option<ApiKey> {
        self.0.clone()
    }
}

/// Secure credential storage with system keyring and environment fallback.
///
/// # Storage Priority
///
/// When retrieving credentials:
/// 1. System keyring (if available)
/// 2. Environment variables (if `env_fallback` is enabled)
///
/// When storing credentials:
/// - Always uses system keyring
/// - Environment variables are read-only
pub struct CredentialStore {
    service_name: String,
    env_fallback: bool,
}

impl CredentialStore {
    /// Create a new credential store.
    ///
    /// # Arguments
    ///
    /// * `service_name` - Service identifier for keyring (e.g., "avatar")
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            env_fallback: false,
        }
    }

    /// Enable environment variable fallback.
    pub fn with_env_fallback(mut self) -> Self {
        self.env_fallback = true;
        self
    }

    /// Get an API key for a provider.
    ///
    /// Checks the system keyring first, then environment variables
    /// if fallback is enabled. Blank values are treated as missing.
    ///
    /// # Errors
    ///
    /// Returns `Error::CredentialsNotFound` if no credentials are found.
    pub fn get(&self, provider: &str) -> Result<ApiKey> {
        if let Some(key) = self.get_from_keyring(provider) {
            debug!(provider, "retrieved API key from keyring");
            return Ok(key);
        }

        if self.env_fallback
            && let Some(key) = self.get_from_env(provider)
        {
            debug!(provider, "retrieved API key from environment");
            return Ok(key);
        }

        Err(Error::CredentialsNotFound(provider.to_string()))
    }

    /// Store an API key for a provider in the system keyring.
    ///
    /// # Errors
    ///
    /// Returns `Error::Keyring` if the keyring operation fails or the
    /// stored key cannot be read back.
    pub fn set(&self, provider: &str, key: &str) -> Result<()> {
        let entry = self.keyring_entry(provider)?;
        entry
            .set_password(key)
            .map_err(|e| Error::Keyring(e.to_string()))?;

        // A fresh entry must see the key, otherwise the backend is not persistent
        match self.get_from_keyring(provider) {
            Some(stored) if stored.expose_secret() == key => {}
            _ => {
                return Err(Error::Keyring(
                    "the key was not persisted by the system keyring".to_string(),
                ));
            }
        }

        debug!(provider, "stored API key in keyring");
        Ok(())
    }

    /// Delete an API key from the system keyring.
    ///
    /// # Errors
    ///
    /// Returns `Error::Keyring` if the keyring operation fails.
    /// Returns `Error::CredentialsNotFound` if no credentials exist.
    pub fn delete(&self, provider: &str) -> Result<()> {
        let entry = self.keyring_entry(provider)?;
        entry.delete_credential().map_err(|e| match e {
            keyring::Error::NoEntry => Error::CredentialsNotFound(provider.to_string()),
            _ => Error::Keyring(e.to_string()),
        })?;
        debug!(provider, "deleted API key from keyring");
        Ok(())
    }

    /// Get the source of a credential (keyring or env).
    pub fn credential_source(&self, provider: &str) -> Option<CredentialSource> {
        if self.get_from_keyring(provider).is_some() {
            Some(CredentialSource::Keyring)
        } else if self.env_fallback && self.get_from_env(provider).is_some() {
            Some(CredentialSource::Environment)
        } else {
            None
        }
    }

    fn keyring_entry(&self, provider: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service_name, provider).map_err(|e| Error::Keyring(e.to_string()))
    }

    fn get_from_keyring(&self, provider: &str) -> Option<ApiKey> {
        let entry = self.keyring_entry(provider).ok()?;
        entry
            .get_password()
            .ok()
            .map(ApiKey::new)
            .filter(|key| !key.is_blank())
    }

    fn get_from_env(&self, provider: &str) -> Option<ApiKey> {
        env_vars_for_provider(provider)
            .iter()
            .filter_map(|var| env::var(var).ok())
            .map(|value| ApiKey::new(value.trim()))
            .find(|key| !key.is_blank())
    }
}

impl KeySource for CredentialStore {
    fn api_key(&self) -> Option<ApiKey> {
        self.get(GOOGLE_PROVIDER).ok()
    }
}

/// Source of a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Stored in system keyring.
    Keyring,
    /// From environment variable.
    Environment,
}
