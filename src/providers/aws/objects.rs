//! Ranged object download
//!
//! The first ranged GET reveals the object size through `Content-Range`;
//! the remaining parts are fetched concurrently and written in order.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::debug;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use super::types::{
    sdk_error_message, DEFAULT_PART_CONCURRENCY, DEFAULT_PART_SIZE, WRITE_BUFFER_SIZE,
};
use crate::error::FetchError;
use crate::providers::ObjectFetcher;

const RANGE_NOT_SATISFIABLE: u16 = 416;

#[derive(Debug, Clone)]
pub struct S3Fetcher {
    client: Client,
    part_size: u64,
    part_concurrency: usize,
}

impl S3Fetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            part_size: DEFAULT_PART_SIZE,
            part_concurrency: DEFAULT_PART_CONCURRENCY,
        }
    }

    pub fn with_part_size(mut self, part_size: u64) -> Self {
        self.part_size = part_size.max(1);
        self
    }

    pub fn with_part_concurrency(mut self, part_concurrency: usize) -> Self {
        self.part_concurrency = part_concurrency.max(1);
        self
    }

    async fn fetch_range(
        &self,
        bucket: &str,
        key: &str,
        etag: Option<&str>,
        start: u64,
        end: u64,
    ) -> Result<Vec<u8>, FetchError> {
        // Pinned to the first response so a replaced object fails instead of mixing
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .set_if_match(etag.map(str::to_string))
            .range(range_header(start, end))
            .send()
            .await
            .map_err(|e| FetchError::Request(sdk_error_message(&e)))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?
            .to_vec();

        let expected = end - start + 1;
        if bytes.len() as u64 != expected {
            return Err(FetchError::Body(format!(
                "range {}-{} returned {} bytes, expected {}",
                start,
                end,
                bytes.len(),
                expected
            )));
        }
        Ok(bytes)
    }
}

#[async_trait]
impl ObjectFetcher for S3Fetcher {
    async fn fetch(&self, bucket: &str, key: &str, sink: &mut File) -> Result<u64, FetchError> {
        let first = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .range(range_header(0, self.part_size - 1))
            .send()
            .await;

        let output = match first {
            Ok(output) => output,
            Err(err) => {
                // S3 rejects any range on a zero-length object
                let status = err.raw_response().map(|r| r.status().as_u16());
                if status == Some(RANGE_NOT_SATISFIABLE) {
                    debug!("fetch: {} is empty", key);
                    return Ok(0);
                }
                return Err(FetchError::Request(sdk_error_message(&err)));
            }
        };

        let total = output.content_range().and_then(parse_total_size);
        let etag = output.e_tag().map(|s| s.to_string());
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, sink);
        let mut written = write_body(output.body, &mut writer).await?;

        // Without a Content-Range the server sent the whole object
        if let Some(total) = total {
            let ranges = part_ranges(written, total, self.part_size);
            if !ranges.is_empty() {
                debug!("fetch: {} size={} parts={}", key, total, ranges.len() + 1);
            }

            let mut parts = stream::iter(ranges)
                .map(|(start, end)| self.fetch_range(bucket, key, etag.as_deref(), start, end))
                .buffered(self.part_concurrency);

            while let Some(part) = parts.try_next().await? {
                writer.write_all(&part).await?;
                written += part.len() as u64;
            }

            if written != total {
                return Err(FetchError::Body(format!(
                    "wrote {} bytes of {} for {}",
                    written, total, key
                )));
            }
        }

        writer.flush().await?;
        Ok(written)
    }
}

async fn write_body<W>(mut body: ByteStream, writer: &mut W) -> Result<u64, FetchError>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| FetchError::Body(e.to_string()))?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    Ok(written)
}

fn range_header(start: u64, end: u64) -> String {
    format!("bytes={}-{}", start, end)
}

/// Total object size from a `Content-Range` value such as `bytes 0-99/1234`
fn parse_total_size(content_range: &str) -> Option<u64> {
    let total = content_range.rsplit('/').next()?.trim();
    if total == "*" {
        return None;
    }
    total.parse().ok()
}

/// Inclusive byte ranges covering `[start, total)` in `part_size` steps
fn part_ranges(start: u64, total: u64, part_size: u64) -> Vec<(u64, u64)> {
    let mut ranges = Vec::new();
    let mut offset = start;
    while offset < total {
        let end = offset.saturating_add(part_size).min(total) - 1;
        ranges.push((offset, end));
        offset = end + 1;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::{parse_total_size, part_ranges, range_header};

    #[test]
    fn total_size_comes_from_content_range_suffix() {
        assert_eq!(parse_total_size("bytes 0-5242879/12000000"), Some(12_000_000));
        assert_eq!(parse_total_size("bytes 0-9/10"), Some(10));
        assert_eq!(parse_total_size("bytes 0-9/*"), None);
        assert_eq!(parse_total_size("garbage"), None);
    }

    #[test]
    fn part_ranges_cover_the_rest_of_the_object() {
        assert_eq!(part_ranges(4, 10, 4), vec![(4, 7), (8, 9)]);
        assert_eq!(part_ranges(10, 10, 4), vec![]);
        assert_eq!(part_ranges(3, 4, 4), vec![(3, 3)]);
        assert_eq!(part_ranges(1, 10, u64::MAX), vec![(1, 9)]);
    }

    #[test]
    fn range_header_is_inclusive() {
        assert_eq!(range_header(0, 5242879), "bytes=0-5242879");
    }
}
