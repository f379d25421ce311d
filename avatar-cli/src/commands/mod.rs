pub mod annotate;
pub mod config;
pub mod models;
pub mod serve;

use std::sync::Arc;

use anyhow::Result;
use avatar_models::Annotator;
use avatar_models::auth::CredentialStore;
use avatar_models::providers::GeminiClient;

use crate::config::AvatarConfig;

/// Keyring service name for stored credentials
pub const KEYRING_SERVICE: &str = "avatar";

/// Credential store used by every command: keyring, then environment.
pub fn credential_store() -> CredentialStore {
    CredentialStore::new(KEYRING_SERVICE).with_env_fallback()
}

/// Build the annotation service from configuration.
pub fn build_annotator(config: &AvatarConfig) -> Result<Annotator> {
    let client = GeminiClient::new(config.provider.transport())?;
    Ok(Annotator::new(Arc::new(client)).with_generation_config(config.provider.generation()))
}
