use async_trait::async_trait;
use aws_sdk_s3::Client;

use super::types::{sdk_error_message, LIST_PAGE_SIZE};
use crate::error::ListError;
use crate::providers::{ListPage, ObjectLister};

/// `ListObjectsV2` backed key listing
#[derive(Debug, Clone)]
pub struct S3Lister {
    client: Client,
}

impl S3Lister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectLister for S3Lister {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, ListError> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(LIST_PAGE_SIZE);

        if let Some(token) = continuation {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ListError::Request(sdk_error_message(&e)))?;

        // Folder markers have no content to mirror
        let keys = response
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?;
                if key.ends_with('/') {
                    return None;
                }
                Some(key.to_string())
            })
            .collect();

        let next_continuation = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(|s| s.to_string())
        } else {
            None
        };

        Ok(ListPage {
            keys,
            next_continuation,
        })
    }
}
