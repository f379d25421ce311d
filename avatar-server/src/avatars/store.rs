//! Custom avatar catalog storage

use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use super::AvatarError;
use super::catalog::AvatarEntry;

/// Custom catalog file name
pub const CUSTOM_AVATARS_FILE: &str = "custom_avatars.json";

/// File-backed catalog of avatars added from custom URLs.
///
/// The file is re-read on every access so hand edits are picked up. Writes
/// are read-modify-write under a lock so concurrent inserts do not lose
/// entries.
pub struct CustomCatalog {
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl CustomCatalog {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Load all entries. A missing, unreadable or corrupt file is empty.
    pub async fn load(&self) -> BTreeMap<String, AvatarEntry> {
        let content = match fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "Failed to read custom avatars");
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.file_path.display(), error = %e, "Ignoring corrupt custom avatars file");
            BTreeMap::new()
        })
    }

    /// Add or replace an entry and persist the catalog.
    pub async fn insert(&self, id: &str, entry: AvatarEntry) -> Result<(), AvatarError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await;
        entries.insert(id.to_string(), entry);

        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AvatarError::Storage(format!("failed to create catalog dir: {e}")))?;
        }

        let content = serde_json::to_string_pretty(&entries)
            .map_err(|e| AvatarError::Storage(format!("failed to serialize catalog: {e}")))?;

        fs::write(&self.file_path, content)
            .await
            .map_err(|e| AvatarError::Storage(format!("failed to write catalog: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::tempdir;

    use super::*;

    fn entry(name: &str) -> AvatarEntry {
        AvatarEntry::new(name, "F", format!("https://example.com/{name}.glb"))
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let catalog = CustomCatalog::new(dir.path().join(CUSTOM_AVATARS_FILE));
        assert!(catalog.load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CUSTOM_AVATARS_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let catalog = CustomCatalog::new(&path);
        assert!(catalog.load().await.is_empty());
    }

    #[tokio::test]
    async fn insert_persists_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CUSTOM_AVATARS_FILE);
        let catalog = CustomCatalog::new(&path);

        catalog.insert("custom_abc123", entry("uno")).await.unwrap();
        catalog.insert("custom_def456", entry("dos")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"custom_abc123\""));

        let loaded = catalog.load().await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["custom_def456"].name, "dos");
    }

    #[tokio::test]
    async fn concurrent_inserts_keep_every_entry() {
        let dir = tempdir().unwrap();
        let catalog = Arc::new(CustomCatalog::new(dir.path().join(CUSTOM_AVATARS_FILE)));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move {
                    catalog
                        .insert(&format!("custom_{i}"), entry(&i.to_string()))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(catalog.load().await.len(), 8);
    }
}
