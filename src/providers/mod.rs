//! Remote object store capabilities consumed by the mirror pipeline
//!
//! The pipeline only sees the two traits below. `aws` provides the S3
//! implementation; tests plug in scripted fakes.

pub mod aws;
pub mod s3_client;

use async_trait::async_trait;
use tokio::fs::File;

use crate::error::{FetchError, ListError};

/// One page of a key listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Token for the next page, `None` on the last page
    pub next_continuation: Option<String>,
}

#[async_trait]
pub trait ObjectLister: Send + Sync {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, ListError>;
}

#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Write the object's bytes into `sink` starting at its current position.
    /// Returns the number of bytes written.
    async fn fetch(&self, bucket: &str, key: &str, sink: &mut File) -> Result<u64, FetchError>;
}
