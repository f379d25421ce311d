use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::{
    AvatarConfig, ProviderConfig, RawAvatarConfig, RawProviderConfig, RawServerConfig,
    ServerConfig,
};

/// Overrides the project config directory (useful for isolated tests)
pub const PROJECT_CONFIG_ENV: &str = "AVATAR_PROJECT_CONFIG_DIR";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<AvatarConfig> {
        Self::load_from(&Self::user_config_path(), &Self::project_config_path())
    }

    /// Load and merge the two layers from explicit paths
    pub fn load_from(user_path: &Path, project_path: &Path) -> Result<AvatarConfig> {
        let mut raw = RawAvatarConfig::default();

        // Layer 1: User config
        if user_path.exists() {
            raw = Self::merge_raw(raw, Self::read(user_path)?);
        }

        // Layer 2: Project config
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read(project_path)?);
        }

        Ok(Self::finalize(raw))
    }

    fn read(path: &Path) -> Result<RawAvatarConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Get user config path
    pub fn user_config_path() -> PathBuf {
        avatar_paths::config_dir().join("config.toml")
    }

    /// Get project config path
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var(PROJECT_CONFIG_ENV) {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".avatar/config.toml")
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawAvatarConfig, overlay: RawAvatarConfig) -> RawAvatarConfig {
        RawAvatarConfig {
            server: RawServerConfig {
                host: overlay.server.host.or(base.server.host),
                port: overlay.server.port.or(base.server.port),
                static_dir: overlay.server.static_dir.or(base.server.static_dir),
                avatars_dir: overlay.server.avatars_dir.or(base.server.avatars_dir),
            },
            provider: RawProviderConfig {
                base_url: overlay.provider.base_url.or(base.provider.base_url),
                insecure_transport: overlay
                    .provider
                    .insecure_transport
                    .or(base.provider.insecure_transport),
                discovery_timeout_secs: overlay
                    .provider
                    .discovery_timeout_secs
                    .or(base.provider.discovery_timeout_secs),
                generation_timeout_secs: overlay
                    .provider
                    .generation_timeout_secs
                    .or(base.provider.generation_timeout_secs),
                temperature: overlay.provider.temperature.or(base.provider.temperature),
                max_output_tokens: overlay
                    .provider
                    .max_output_tokens
                    .or(base.provider.max_output_tokens),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawAvatarConfig) -> AvatarConfig {
        let server = ServerConfig::default();
        let provider = ProviderConfig::default();

        AvatarConfig {
            server: ServerConfig {
                host: raw.server.host.unwrap_or(server.host),
                port: raw.server.port.unwrap_or(server.port),
                static_dir: raw.server.static_dir.unwrap_or(server.static_dir),
                avatars_dir: raw.server.avatars_dir,
            },
            provider: ProviderConfig {
                base_url: raw.provider.base_url.unwrap_or(provider.base_url),
                insecure_transport: raw
                    .provider
                    .insecure_transport
                    .unwrap_or(provider.insecure_transport),
                discovery_timeout_secs: raw
                    .provider
                    .discovery_timeout_secs
                    .unwrap_or(provider.discovery_timeout_secs),
                generation_timeout_secs: raw
                    .provider
                    .generation_timeout_secs
                    .unwrap_or(provider.generation_timeout_secs),
                temperature: raw.provider.temperature.unwrap_or(provider.temperature),
                max_output_tokens: raw
                    .provider
                    .max_output_tokens
                    .unwrap_or(provider.max_output_tokens),
            },
        }
    }
}
