//! Error types for provider and credential operations.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to a provider or the credential store.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials not found for provider.
    #[error("credentials not found for provider: {0}")]
    CredentialsNotFound(String),

    /// Failed to access system keyring.
    #[error("keyring error: {0}")]
    Keyring(String),

    /// The call did not complete within its time budget.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Request failed before a response was received.
    #[error("request failed: {0}")]
    Request(String),
}

impl Error {
    /// Build a transport error from a `reqwest` failure, keeping timeouts distinct.
    ///
    /// The request URL is dropped from the description because it carries
    /// the API key as a query parameter.
    pub(crate) fn from_transport(err: reqwest::Error, budget: Duration) -> Self {
        if err.is_timeout() {
            return Error::Timeout(budget);
        }

        let err = err.without_url();
        let mut description = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            description.push_str(": ");
            description.push_str(&cause.to_string());
            source = cause.source();
        }
        Error::Request(description)
    }
}
