//! Error types for the multimodal prompt builder.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while building or submitting a multimodal prompt.
#[derive(Debug, Error)]
pub enum MultiModalError {
    /// A local file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path that was read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Downloading a URL failed, returned a non-success status, or had no MIME type.
    #[error("failed to download {url}: {message}")]
    Network {
        /// The URL that was fetched
        url: String,
        /// What went wrong
        message: String,
    },

    /// A client for the model service could not be created.
    #[error("unable to create client: {0}")]
    Connection(String),

    /// The generation or token counting request failed.
    #[error("unable to generate contents: {0}")]
    Generation(String),

    /// The model answered without any candidates or content parts.
    #[error("empty response from model")]
    EmptyResponse,

    /// A panic was caught while the request or response was being processed.
    #[error("panic occurred: {0}")]
    InternalFault(String),

    /// The configured timeout elapsed before the operation completed.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// A required environment variable is not set.
    #[error("environment variable not set: {0}")]
    Env(String),
}

impl MultiModalError {
    /// Creates a new Network error for `url`.
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// A `Result` alias where the error is [`MultiModalError`].
pub type Result<T> = std::result::Result<T, MultiModalError>;
