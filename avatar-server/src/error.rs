//! Server error types

use thiserror::Error;

use crate::avatars::AvatarError;

/// Errors that can occur starting or running the avatar server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Avatar library could not be set up
    #[error("avatar library error: {0}")]
    Avatars(#[from] AvatarError),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}
