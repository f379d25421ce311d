//! Avatar serve command for running the backend server
//!
//! The serve command runs the avatar server which provides:
//! - Emotion annotation (`/adaptar`) and key diagnostics (`/test-api`)
//! - The local avatar library and its downloads
//! - The web UI from the static directory

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use avatar_server::avatars::AvatarLibrary;
use avatar_server::{AppState, AvatarServer, ServerConfig};
use clap::Args;
use tokio::net::TcpStream;
use tracing::{info, warn};

use super::{build_annotator, credential_store};
use crate::config::{AvatarConfig, ConfigLoader};

/// How long the single-instance check waits for a connection
const INSTANCE_CHECK_TIMEOUT: Duration = Duration::from_millis(500);

/// Arguments for the serve command
///
/// Flags override the merged config files.
#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Directory with index.html and UI assets
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Directory for downloaded .glb avatars
    #[arg(long)]
    pub avatars_dir: Option<PathBuf>,

    /// Accept invalid TLS certificates (intercepting proxies)
    #[arg(long)]
    pub insecure: bool,
}

impl ServeArgs {
    fn apply(self, config: &mut AvatarConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = self.static_dir {
            config.server.static_dir = dir;
        }
        if let Some(dir) = self.avatars_dir {
            config.server.avatars_dir = Some(dir);
        }
        if self.insecure {
            config.provider.insecure_transport = true;
        }
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    args.apply(&mut config);

    ensure_single_instance(&config.server.host, config.server.port).await?;

    let annotator = build_annotator(&config)?;
    let library = AvatarLibrary::new(
        config.server.avatars_dir(),
        avatar_paths::custom_avatars_file(),
        config.provider.insecure_transport,
    )?;
    let state = Arc::new(AppState::new(
        annotator,
        Arc::new(credential_store()),
        library,
    ));

    if state.api_key().is_none() {
        warn!("No Gemini API key configured; set GOOGLE_API_KEY or run `avatar models auth`");
    }

    info!(
        "Starting avatar server on {}:{}",
        config.server.host, config.server.port
    );

    let server_config = ServerConfig::new(config.server.host, config.server.port)
        .with_static_dir(config.server.static_dir);
    AvatarServer::new(server_config, state).run().await?;
    Ok(())
}

/// Fail if something already answers on `host:port`.
async fn ensure_single_instance(host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    if let Ok(Ok(_)) = tokio::time::timeout(INSTANCE_CHECK_TIMEOUT, TcpStream::connect(&addr)).await {
        bail!("avatar is already running on {addr}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn detects_running_instance() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let err = ensure_single_instance("127.0.0.1", port).await.unwrap_err();
        assert!(err.to_string().contains("already running"));
    }

    #[tokio::test]
    async fn free_port_passes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(ensure_single_instance("127.0.0.1", port).await.is_ok());
    }

    #[test]
    fn flags_override_config() {
        let mut config = AvatarConfig::default();
        let args = ServeArgs {
            port: Some(5050),
            avatars_dir: Some(PathBuf::from("/tmp/avatares")),
            insecure: true,
            ..Default::default()
        };
        args.apply(&mut config);

        assert_eq!(config.server.port, 5050);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.avatars_dir(), PathBuf::from("/tmp/avatares"));
        assert!(config.provider.insecure_transport);
    }
}
