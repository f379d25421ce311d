//! Local library of `.glb` avatar models.
//!
//! Avatars are fetched from a catalog (built-in entries plus custom URLs the
//! user added) into a single directory that the HTTP layer serves under
//! `/avatares/`.

pub mod catalog;
pub mod store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

pub use catalog::{AvatarEntry, MORPH_PARAMS};
pub use store::{CUSTOM_AVATARS_FILE, CustomCatalog};

/// Files at or below this size are treated as incomplete and fetched again.
pub const MIN_COMPLETE_SIZE: u64 = 100_000;

/// Budget for a whole avatar download.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(90);

const MODEL_EXTENSION: &str = ".glb";

/// Errors from the avatar library
#[derive(Debug, Error)]
pub enum AvatarError {
    /// Neither a custom URL nor a known avatar id was given
    #[error("Debes enviar custom_url o un avatar_id válido.")]
    InvalidRequest,

    /// The remote answered with a non-200 status
    #[error(
        "Error HTTP {0} - Avatar no disponible en la nube. Usa el creador de avatares en https://readyplayer.me para obtener tu propio enlace .glb"
    )]
    Unavailable(u16),

    /// The download did not complete
    #[error("{0}")]
    Transport(String),

    /// Reading or writing local files failed
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for AvatarError {
    fn from(err: std::io::Error) -> Self {
        AvatarError::Storage(err.to_string())
    }
}

/// Body of a download request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub avatar_id: Option<String>,
    #[serde(default)]
    pub custom_url: Option<String>,
}

/// Result of a successful download (or skip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    pub avatar_id: String,
    /// URL path the UI loads the model from.
    pub path: String,
    pub message: String,
    #[serde(skip)]
    pub already_present: bool,
}

/// An avatar model present on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAvatar {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub path: String,
    pub is_local: bool,
}

/// Avatar directory, catalogs and the client used to fetch models.
pub struct AvatarLibrary {
    dir: PathBuf,
    custom: CustomCatalog,
    client: reqwest::Client,
}

impl AvatarLibrary {
    /// Create a library rooted at `dir`, with custom entries in `custom_file`.
    ///
    /// `insecure_transport` disables certificate validation for downloads.
    pub fn new(
        dir: impl Into<PathBuf>,
        custom_file: impl Into<PathBuf>,
        insecure_transport: bool,
    ) -> Result<Self, AvatarError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_transport)
            .build()
            .map_err(|e| AvatarError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            dir: dir.into(),
            custom: CustomCatalog::new(custom_file),
            client,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn custom_catalog(&self) -> &CustomCatalog {
        &self.custom
    }

    /// Built-in entries with custom entries merged over them.
    pub async fn catalog(&self) -> BTreeMap<String, AvatarEntry> {
        let mut merged = catalog::builtin();
        merged.extend(self.custom.load().await);
        merged
    }

    /// Fetch an avatar into the library.
    ///
    /// A non-empty `custom_url` wins over `avatar_id` and is recorded in the
    /// custom catalog before the download starts. Existing complete files
    /// are not fetched again.
    pub async fn download(&self, request: DownloadRequest) -> Result<DownloadOutcome, AvatarError> {
        let custom_url = request.custom_url.as_deref().map(str::trim).unwrap_or("");
        let avatar_id = request.avatar_id.as_deref().map(str::trim).unwrap_or("");

        let (avatar_id, entry) = if !custom_url.is_empty() {
            let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(6).collect();
            let id = format!("custom_{suffix}");
            let entry = AvatarEntry::new(
                format!("Personalizado {suffix}"),
                "F",
                catalog::with_morph_targets(custom_url),
            );
            self.custom.insert(&id, entry.clone()).await?;
            (id, entry)
        } else if !avatar_id.is_empty() {
            let entry = self
                .catalog()
                .await
                .remove(avatar_id)
                .ok_or(AvatarError::InvalidRequest)?;
            (avatar_id.to_string(), entry)
        } else {
            return Err(AvatarError::InvalidRequest);
        };

        fs::create_dir_all(&self.dir).await?;
        let target = self.dir.join(format!("{avatar_id}{MODEL_EXTENSION}"));
        let path = format!("/avatares/{avatar_id}{MODEL_EXTENSION}");

        if let Ok(meta) = fs::metadata(&target).await
            && meta.len() > MIN_COMPLETE_SIZE
        {
            info!(avatar = %entry.name, size = meta.len(), "Avatar already downloaded");
            return Ok(DownloadOutcome {
                avatar_id,
                path,
                message: format!("Ya descargado ({})", megabytes(meta.len())),
                already_present: true,
            });
        }

        let preview: String = entry.url.chars().take(70).collect();
        info!(avatar = %entry.name, url = %preview, "Downloading avatar");

        let size = self.fetch(&entry.url, &target).await?;
        info!(avatar = %entry.name, size, "Avatar downloaded");

        Ok(DownloadOutcome {
            avatar_id,
            path,
            message: format!("Descargado ({})", megabytes(size)),
            already_present: false,
        })
    }

    /// Stream `url` into `target`, returning the byte count.
    ///
    /// The body goes to a sibling `.part` file first so an interrupted
    /// download never leaves a truncated model behind.
    async fn fetch(&self, url: &str, target: &Path) -> Result<u64, AvatarError> {
        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| AvatarError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            warn!(status, "Avatar download rejected");
            return Err(AvatarError::Unavailable(status));
        }

        let partial = target.with_extension("glb.part");
        let written = match write_body(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        fs::rename(&partial, target).await?;

        Ok(written)
    }

    /// `.glb` file names in the library, sorted.
    pub async fn check_models(&self) -> Result<Vec<String>, AvatarError> {
        fs::create_dir_all(&self.dir).await?;

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(MODEL_EXTENSION) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Avatars present on disk with their display metadata.
    ///
    /// Names come from the built-in default first, then the custom catalog,
    /// then the file name.
    pub async fn list_local(&self) -> Result<Vec<LocalAvatar>, AvatarError> {
        let files = self.check_models().await?;
        let custom = self.custom.load().await;
        let builtin = catalog::builtin();

        let avatars = files
            .into_iter()
            .map(|file| {
                let id = file.trim_end_matches(MODEL_EXTENSION).to_string();
                let known = if id == catalog::DEFAULT_AVATAR_ID {
                    builtin.get(&id)
                } else {
                    custom.get(&id)
                };
                let (name, gender) = match known {
                    Some(entry) => (entry.name.clone(), entry.gender.clone()),
                    None => (catalog::title_case(&id), "F".to_string()),
                };
                LocalAvatar {
                    path: format!("/avatares/{file}"),
                    id,
                    name,
                    gender,
                    is_local: true,
                }
            })
            .collect();

        Ok(avatars)
    }
}

/// Stream a response body into `path`, returning the byte count.
async fn write_body(response: reqwest::Response, path: &Path) -> Result<u64, AvatarError> {
    let mut file = fs::File::create(path).await?;
    let mut written = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AvatarError::Transport(e.to_string()))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

fn megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
