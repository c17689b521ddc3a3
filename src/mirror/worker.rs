//! Mirror worker - drains the key queue and downloads each key with retries

use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, Mutex};

use super::fs::{key_to_path, LocalFs};
use super::progress::ProgressTracker;
use super::types::MAX_ATTEMPTS;
use crate::error::MirrorError;
use crate::providers::ObjectFetcher;

/// Shared read side of the bounded key queue
pub(crate) type KeyQueue = Arc<Mutex<mpsc::Receiver<String>>>;

pub(crate) struct Worker {
    pub id: usize,
    pub bucket: Arc<str>,
    pub destination: Arc<Path>,
    pub queue: KeyQueue,
    pub fetcher: Arc<dyn ObjectFetcher>,
    pub fs: Arc<dyn LocalFs>,
    pub progress: Arc<ProgressTracker>,
}

impl Worker {
    /// Process keys until the queue is closed and empty.
    /// Returns the number of keys this worker mirrored.
    pub(crate) async fn run(self) -> Result<u64, MirrorError> {
        debug!("worker {} started", self.id);
        let mut mirrored = 0u64;

        loop {
            let key = {
                let mut rx = self.queue.lock().await;
                rx.recv().await
            };
            let Some(key) = key else {
                break;
            };

            if let Err(e) = self.mirror_key(&key).await {
                error!("worker {}: giving up on {}: {}", self.id, key, e);
                return Err(e);
            }
            mirrored += 1;
        }

        debug!("worker {} finished, mirrored {} keys", self.id, mirrored);
        Ok(mirrored)
    }

    async fn mirror_key(&self, key: &str) -> Result<(), MirrorError> {
        let path = key_to_path(&self.destination, key).ok_or_else(|| MirrorError::InvalidKey {
            key: key.to_string(),
        })?;

        // Preparing: failures here are never retried
        self.fs.create_parent_dirs(&path).await.map_err(|e| {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| path.clone());
            MirrorError::filesystem(dir, e)
        })?;
        let mut file = self
            .fs
            .create_file(&path)
            .await
            .map_err(|e| MirrorError::filesystem(&path, e))?;

        let result = self.fetch_with_retry(key, &path, &mut file).await;
        drop(file);

        match result {
            Ok(bytes) => {
                let (completed, discovered) = self.progress.record_completed();
                info!(
                    "worker {}: ({}/{}) downloaded {} ({} bytes)",
                    self.id, completed, discovered, key, bytes
                );
                Ok(())
            }
            Err(e) => {
                if let Err(remove_err) = self.fs.remove_file(&path).await {
                    warn!(
                        "worker {}: failed to remove {}: {}",
                        self.id,
                        path.display(),
                        remove_err
                    );
                }
                Err(e)
            }
        }
    }

    /// Download `key` into `file`, rewinding and truncating between attempts
    /// so a partial write never survives into the final content.
    async fn fetch_with_retry(
        &self,
        key: &str,
        path: &Path,
        file: &mut File,
    ) -> Result<u64, MirrorError> {
        let mut attempt = 1;
        loop {
            let err = match self.fetcher.fetch(&self.bucket, key, file).await {
                Ok(bytes) => {
                    file.flush()
                        .await
                        .map_err(|e| MirrorError::filesystem(path, e))?;
                    return Ok(bytes);
                }
                Err(err) => err,
            };

            warn!(
                "worker {}: attempt {}: failed to download {}: {}",
                self.id, attempt, key, err
            );
            if attempt >= MAX_ATTEMPTS {
                return Err(MirrorError::DownloadExhausted {
                    key: key.to_string(),
                    attempts: attempt,
                    source: err,
                });
            }

            self.fs
                .reset_file(file)
                .await
                .map_err(|e| MirrorError::filesystem(path, e))?;
            attempt += 1;
        }
    }
}
