//! Mirror run configuration

use serde::Serialize;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::mirror::{DEFAULT_CONCURRENCY, DEFAULT_QUEUE_CAPACITY};

#[derive(Debug, Clone, Serialize)]
pub struct MirrorConfig {
    pub bucket: String,
    pub prefix: String,
    pub destination: PathBuf,
    /// Number of workers draining the key queue
    pub concurrency: usize,
    /// Keys buffered between the lister and the workers
    pub queue_capacity: usize,
}

impl MirrorConfig {
    pub fn new(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            destination: destination.into(),
            concurrency: DEFAULT_CONCURRENCY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::Missing("bucket name"));
        }
        if self.prefix.is_empty() {
            return Err(ConfigError::Missing("prefix"));
        }
        if self.destination.as_os_str().is_empty() {
            return Err(ConfigError::Missing("destination directory"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "queue_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Create the destination root if it does not exist yet
    pub async fn ensure_destination(&self) -> Result<(), ConfigError> {
        tokio::fs::create_dir_all(&self.destination)
            .await
            .map_err(|source| ConfigError::Destination {
                path: self.destination.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_concurrency_and_capacity() {
        let config = MirrorConfig::new("bucket", "data/", "/tmp/out");
        assert_eq!(config.concurrency, 50);
        assert_eq!(config.queue_capacity, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let err = MirrorConfig::new("", "data/", "/tmp/out")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("bucket name")));

        let err = MirrorConfig::new("bucket", "", "/tmp/out")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("prefix")));

        let err = MirrorConfig::new("bucket", "data/", "")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("destination directory")));
    }

    #[test]
    fn validate_rejects_zero_workers_and_capacity() {
        let err = MirrorConfig::new("bucket", "data/", "/tmp/out")
            .with_concurrency(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "concurrency", .. }));

        let err = MirrorConfig::new("bucket", "data/", "/tmp/out")
            .with_queue_capacity(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "queue_capacity", .. }));
    }

    #[tokio::test]
    async fn ensure_destination_creates_nested_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a/b/c");
        let config = MirrorConfig::new("bucket", "data/", &root);

        config.ensure_destination().await.unwrap();
        config.ensure_destination().await.unwrap();
        assert!(root.is_dir());
    }
}
