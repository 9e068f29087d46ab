//! Error types for registry operations.

use thiserror::Error;

/// Result type alias using [`RegistryError`] as the error type.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur during registry operations.
///
/// Nothing here is retried by the client. Every variant is handed back to the
/// caller, and the caches are left untouched.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry could not be reached (connection, DNS or timeout).
    #[error("Failed to reach registry at {url}: {message}")]
    Transport {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
        /// Whether the request hit the configured timeout.
        timed_out: bool,
        /// Underlying HTTP error, if any.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The registry answered with a non-success status.
    ///
    /// `code` and `message` come from the registry's error body when it
    /// parses, otherwise from the HTTP status.
    #[error("Registry error {code}: {message}")]
    Registry {
        /// HTTP status code.
        status: u16,
        /// Registry error code (e.g. `40403`), or the HTTP status.
        code: i32,
        /// Error message.
        message: String,
    },

    /// The registry returned schema text that does not compile.
    #[error("Failed to compile schema: {source}")]
    Compile {
        /// Underlying codec error.
        #[source]
        source: avrolink_core::Error,
    },

    /// A response body was not the expected JSON.
    #[error("JSON error: {source}")]
    Serialization {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid registry URL.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// URL string.
        url: String,
    },

    /// Credentials cannot be sent as a header.
    #[error("Invalid credentials: {message}")]
    InvalidCredentials {
        /// Error message.
        message: String,
    },

    /// A record could not be encoded or decoded.
    #[error("Codec error: {source}")]
    Codec {
        /// Underlying codec error.
        #[source]
        source: avrolink_core::Error,
    },

    /// Record bytes are not a valid wire envelope.
    #[error("Envelope error: {source}")]
    Envelope {
        /// Underlying envelope error.
        #[source]
        source: avrolink_core::Error,
    },
}

impl RegistryError {
    /// Returns `true` if the registry reported the resource as missing (HTTP 404).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Registry { status: 404, .. })
    }

    /// Returns `true` if the registry could not be reached.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if the request hit the configured timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            url: err
                .url()
                .map_or_else(|| "unknown".to_string(), ToString::to_string),
            message: err.to_string(),
            timed_out: err.is_timeout(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization { source: err }
    }
}
