mod list;
mod objects;
mod region;
mod types;

pub use list::S3Lister;
pub use objects::S3Fetcher;
pub use region::{bucket_region, region_from_constraint};
pub use types::{DEFAULT_PART_CONCURRENCY, DEFAULT_PART_SIZE, LIST_PAGE_SIZE};
