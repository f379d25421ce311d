//! Shared application state for the avatar server

use std::sync::Arc;

use avatar_models::Annotator;
use avatar_models::auth::{ApiKey, KeySource};
use chrono::{DateTime, Utc};

use crate::avatars::AvatarLibrary;

/// Shared application state accessible by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Annotation service
    pub annotator: Arc<Annotator>,
    /// Where the provider key comes from, resolved per request
    pub keys: Arc<dyn KeySource>,
    /// Local avatar models and their catalogs
    pub avatars: Arc<AvatarLibrary>,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(annotator: Annotator, keys: Arc<dyn KeySource>, avatars: AvatarLibrary) -> Self {
        Self {
            annotator: Arc::new(annotator),
            keys,
            avatars: Arc::new(avatars),
            started_at: Utc::now(),
        }
    }

    /// The provider key for the current request.
    pub fn api_key(&self) -> Option<ApiKey> {
        self.keys.api_key()
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
