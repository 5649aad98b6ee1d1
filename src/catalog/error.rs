//! Error types for catalog requests.

use thiserror::Error;

/// Coarse failure classification surfaced to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure, non-success status, or unreadable body.
    Network,
    /// The requested name or id does not exist upstream.
    NotFound,
}

/// Errors that can occur while talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Connection, TLS or timeout failure
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status} for '{url}'")]
    Status { status: u16, url: String },

    /// Detail lookup for a nonexistent name or id
    #[error("'{target}' not found")]
    NotFound { target: String },

    /// Body could not be decoded into the expected shape
    #[error("Failed to decode response from '{url}': {message}")]
    Decode { url: String, message: String },
    /// Configured base URL cannot carry request paths
    #[error("'{url}' is not a usable base URL")]
    InvalidUrl { url: String },
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::Transport { .. }
            | CatalogError::Status { .. }
            | CatalogError::Decode { .. }
            | CatalogError::InvalidUrl { .. } => ErrorKind::Network,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }
}
