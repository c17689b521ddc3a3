//! Mirror constants and report payloads

use serde::Serialize;

/// Fetch attempts per key before the run is aborted
pub const MAX_ATTEMPTS: u32 = 3;

/// Default number of concurrent workers
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Default capacity of the key queue between lister and workers
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Final state of a run that was not aborted
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MirrorReport {
    pub bucket: String,
    pub prefix: String,
    pub discovered: u64,
    pub completed: u64,
    /// False when a listing page failed and later keys were never produced
    pub listing_complete: bool,
}

/// Outcome of the lister task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListingOutcome {
    pub listed: u64,
    pub complete: bool,
}
