//! Mirror every object under an S3 prefix into a local directory tree.
//!
//! Downloads start while the listing is still running: keys stream through a
//! bounded queue into a fixed pool of workers, each retrying a failed key a
//! few times before the whole run is aborted.

pub mod config;
pub mod error;
pub mod mirror;
pub mod providers;

pub use config::MirrorConfig;
pub use error::{ConfigError, FetchError, ListError, MirrorError, RegionError};
pub use mirror::{run_mirror, run_s3_mirror, MirrorReport};
pub use providers::{ListPage, ObjectFetcher, ObjectLister};
