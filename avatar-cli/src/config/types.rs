use std::path::PathBuf;
use std::time::Duration;

use avatar_models::providers::{GenerationConfig, TransportConfig, gemini};
use serde::{Deserialize, Serialize};

/// Default host for the avatar server
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port for the avatar server
pub const DEFAULT_PORT: u16 = avatar_server::DEFAULT_PORT;

/// Default UI directory, relative to the working directory
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAvatarConfig {
    #[serde(default)]
    pub server: RawServerConfig,

    #[serde(default)]
    pub provider: RawProviderConfig,
}

/// Server config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub avatars_dir: Option<PathBuf>,
}

/// Provider config as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawProviderConfig {
    pub base_url: Option<String>,
    pub insecure_transport: Option<bool>,
    pub discovery_timeout_secs: Option<u64>,
    pub generation_timeout_secs: Option<u64>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AvatarConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port for the avatar server
    pub port: u16,

    /// Directory holding `index.html`
    pub static_dir: PathBuf,

    /// Where downloaded `.glb` models live (defaults to the data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatars_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            avatars_dir: None,
        }
    }
}

impl ServerConfig {
    /// Avatar directory, falling back to the per-user data dir
    pub fn avatars_dir(&self) -> PathBuf {
        self.avatars_dir
            .clone()
            .unwrap_or_else(avatar_paths::avatars_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Generative Language API base URL
    pub base_url: String,

    /// Skip TLS certificate validation for outbound calls
    pub insecure_transport: bool,

    pub discovery_timeout_secs: u64,
    pub generation_timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let generation = GenerationConfig::default();
        Self {
            base_url: gemini::DEFAULT_BASE_URL.to_string(),
            insecure_transport: false,
            discovery_timeout_secs: gemini::DISCOVERY_TIMEOUT.as_secs(),
            generation_timeout_secs: gemini::GENERATION_TIMEOUT.as_secs(),
            temperature: generation.temperature,
            max_output_tokens: generation.max_output_tokens,
        }
    }
}

impl ProviderConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.base_url.clone(),
            discovery_timeout: Duration::from_secs(self.discovery_timeout_secs),
            generation_timeout: Duration::from_secs(self.generation_timeout_secs),
            insecure_transport: self.insecure_transport,
        }
    }

    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }
}
