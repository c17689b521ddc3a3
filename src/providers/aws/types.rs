use aws_sdk_s3::error::DisplayErrorContext;

/// Keys requested per `ListObjectsV2` page
pub const LIST_PAGE_SIZE: i32 = 1000;

/// Bytes requested per ranged GET (5 MB)
pub const DEFAULT_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Ranged GETs in flight per object
pub const DEFAULT_PART_CONCURRENCY: usize = 3;

/// Write buffer size for object bodies (2 MB) - reduces I/O operations
pub(crate) const WRITE_BUFFER_SIZE: usize = 2 * 1024 * 1024;

/// Render an SDK error with its full source chain
pub(crate) fn sdk_error_message<E: std::error::Error>(err: E) -> String {
    DisplayErrorContext(err).to_string()
}
