//! Error types for mirror runs
//!
//! Only `FetchError` is recovered locally (the retrying fetcher absorbs it).
//! Every `MirrorError` ends the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// A single listing page could not be fetched
#[derive(Debug, Error)]
pub enum ListError {
    #[error("list request failed: {0}")]
    Request(String),
}

/// A single fetch attempt failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("get request failed: {0}")]
    Request(String),

    #[error("failed to read object body: {0}")]
    Body(String),

    #[error("failed to write object data: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("failed to get location of bucket {bucket}: {message}")]
    Lookup { bucket: String, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to create destination directory {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal outcome of a mirror run
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("filesystem error on {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("key {key:?} does not map to a path under the destination")]
    InvalidKey { key: String },

    #[error("failed to download {key} after {attempts} attempts: {source}")]
    DownloadExhausted {
        key: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MirrorError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MirrorError::Filesystem {
            path: path.into(),
            source,
        }
    }
}
