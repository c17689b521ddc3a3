//! Key producer - streams listing pages into the bounded queue

use log::{debug, error, info};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::progress::ProgressTracker;
use super::types::ListingOutcome;
use crate::providers::ObjectLister;

/// List every key under `prefix`, counting and queueing each one.
///
/// The sender is dropped on return, which closes the queue. A failed page
/// ends the listing; keys already queued are still processed.
pub(crate) async fn run_lister(
    lister: Arc<dyn ObjectLister>,
    bucket: Arc<str>,
    prefix: Arc<str>,
    queue: mpsc::Sender<String>,
    progress: Arc<ProgressTracker>,
) -> ListingOutcome {
    let mut continuation: Option<String> = None;
    let mut listed = 0u64;
    let mut pages = 0u64;

    loop {
        let page = match lister.list_page(&bucket, &prefix, continuation.take()).await {
            Ok(page) => page,
            Err(e) => {
                error!(
                    "Error listing objects in {}/{} after {} pages: {}",
                    bucket, prefix, pages, e
                );
                return ListingOutcome {
                    listed,
                    complete: false,
                };
            }
        };
        pages += 1;

        for key in page.keys {
            progress.record_discovered();
            if queue.send(key).await.is_err() {
                // Every worker is gone; the run was aborted
                debug!("lister: queue closed by consumers, stopping");
                return ListingOutcome {
                    listed,
                    complete: false,
                };
            }
            listed += 1;
        }

        match page.next_continuation {
            Some(token) => continuation = Some(token),
            None => break,
        }
    }

    info!(
        "listing_complete: {}/{} keys={} pages={}",
        bucket, prefix, listed, pages
    );
    ListingOutcome {
        listed,
        complete: true,
    }
}
