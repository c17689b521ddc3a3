//! Local filesystem side of a transfer

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, SeekFrom};

/// Filesystem operations the retrying fetcher needs
#[async_trait]
pub trait LocalFs: Send + Sync {
    /// Create every missing parent directory of `path`
    async fn create_parent_dirs(&self, path: &Path) -> io::Result<()>;

    /// Create `path`, truncating any existing file
    async fn create_file(&self, path: &Path) -> io::Result<File>;

    /// Rewind and truncate an open file to zero length
    async fn reset_file(&self, file: &mut File) -> io::Result<()>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

#[async_trait]
impl LocalFs for TokioFs {
    async fn create_parent_dirs(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) => tokio::fs::create_dir_all(parent).await,
            None => Ok(()),
        }
    }

    async fn create_file(&self, path: &Path) -> io::Result<File> {
        File::create(path).await
    }

    async fn reset_file(&self, file: &mut File) -> io::Result<()> {
        file.seek(SeekFrom::Start(0)).await?;
        file.set_len(0).await
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }
}

/// Map an object key onto a path under `destination`.
///
/// Empty and `.` segments are dropped, so keys such as `a//b`, `/a/b` and
/// `a/./b` all map to the same path as `a/b`. When a listing holds more than
/// one of them they share a destination file and the last transfer wins.
/// Returns `None` for keys that would escape the destination or name no
/// file at all.
pub fn key_to_path(destination: &Path, key: &str) -> Option<PathBuf> {
    let mut path = destination.to_path_buf();
    let mut segments = 0;
    for segment in key.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            segment => {
                path.push(segment);
                segments += 1;
            }
        }
    }
    (segments > 0).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn key_maps_to_relative_path() {
        let root = Path::new("/data/out");
        assert_eq!(
            key_to_path(root, "a/b.txt"),
            Some(PathBuf::from("/data/out/a/b.txt"))
        );
        assert_eq!(
            key_to_path(root, "/a//./b.txt"),
            Some(PathBuf::from("/data/out/a/b.txt"))
        );
    }

    #[test]
    fn keys_differing_in_empty_segments_collide() {
        let root = Path::new("/data/out");
        let plain = key_to_path(root, "a/b");
        assert!(plain.is_some());
        assert_eq!(key_to_path(root, "a//b"), plain);
        assert_eq!(key_to_path(root, "/a/b"), plain);
        assert_eq!(key_to_path(root, "a/./b"), plain);
    }

    #[test]
    fn escaping_or_empty_keys_are_rejected() {
        let root = Path::new("/data/out");
        assert_eq!(key_to_path(root, "../etc/passwd"), None);
        assert_eq!(key_to_path(root, "a/../../b"), None);
        assert_eq!(key_to_path(root, "//"), None);
        assert_eq!(key_to_path(root, ""), None);
    }

    #[tokio::test]
    async fn reset_file_discards_previous_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/file.bin");
        let fs = TokioFs;

        fs.create_parent_dirs(&path).await.unwrap();
        fs.create_parent_dirs(&path).await.unwrap();
        let mut file = fs.create_file(&path).await.unwrap();
        file.write_all(b"partial").await.unwrap();
        fs.reset_file(&mut file).await.unwrap();
        file.write_all(b"ok").await.unwrap();
        file.flush().await.unwrap();
        drop(file);

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"ok");

        fs.remove_file(&path).await.unwrap();
        assert!(!path.exists());
    }
}
