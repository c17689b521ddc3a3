//! Prefix mirroring pipeline
//!
//! A single lister streams keys into a bounded queue while a fixed pool of
//! workers drains it:
//! - Transfers start before the listing is complete
//! - The queue provides backpressure when workers fall behind
//! - Each key is delivered to exactly one worker
//! - Any fatal error aborts every other task and is returned to the caller

mod fs;
mod lister;
mod progress;
mod types;
mod worker;

pub use fs::{key_to_path, LocalFs, TokioFs};
pub use progress::ProgressTracker;
pub use types::{MirrorReport, DEFAULT_CONCURRENCY, DEFAULT_QUEUE_CAPACITY, MAX_ATTEMPTS};

use aws_sdk_s3::Client;
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::config::MirrorConfig;
use crate::error::MirrorError;
use crate::providers::aws::{S3Fetcher, S3Lister};
use crate::providers::{ObjectFetcher, ObjectLister};
use lister::run_lister;
use worker::Worker;

/// Mirror `config.prefix` of `config.bucket` into `config.destination`.
///
/// Returns once every listed key has been written, or with the first fatal
/// error. On error, in-flight transfers are abandoned and the destination
/// tree may be incomplete.
pub async fn run_mirror(
    config: &MirrorConfig,
    lister: Arc<dyn ObjectLister>,
    fetcher: Arc<dyn ObjectFetcher>,
    fs: Arc<dyn LocalFs>,
) -> Result<MirrorReport, MirrorError> {
    config.validate()?;

    let bucket: Arc<str> = Arc::from(config.bucket.as_str());
    let prefix: Arc<str> = Arc::from(config.prefix.as_str());
    let destination: Arc<Path> = Arc::from(config.destination.as_path());
    let progress = Arc::new(ProgressTracker::new());

    info!(
        "mirror_start: s3://{}/{} -> {} workers={} queue={}",
        bucket,
        prefix,
        destination.display(),
        config.concurrency,
        config.queue_capacity
    );

    let (sender, receiver) = mpsc::channel(config.queue_capacity);
    let queue = Arc::new(Mutex::new(receiver));

    // The lister owns the only sender; dropping it closes the queue
    let listing = tokio::spawn(run_lister(
        lister,
        bucket.clone(),
        prefix.clone(),
        sender,
        progress.clone(),
    ));

    let mut workers = JoinSet::new();
    for id in 0..config.concurrency {
        let worker = Worker {
            id,
            bucket: bucket.clone(),
            destination: destination.clone(),
            queue: queue.clone(),
            fetcher: fetcher.clone(),
            fs: fs.clone(),
            progress: progress.clone(),
        };
        workers.spawn(worker.run());
    }
    drop(queue);

    while let Some(joined) = workers.join_next().await {
        let failure = match joined {
            Ok(Ok(_)) => continue,
            Ok(Err(e)) => e,
            Err(join_err) => MirrorError::Worker(join_err.to_string()),
        };
        workers.abort_all();
        listing.abort();
        error!(
            "mirror_aborted: s3://{}/{} completed={}/{}: {}",
            bucket,
            prefix,
            progress.completed(),
            progress.discovered(),
            failure
        );
        return Err(failure);
    }

    let outcome = listing
        .await
        .map_err(|e| MirrorError::Worker(format!("lister: {}", e)))?;
    if !outcome.complete {
        warn!(
            "mirror_partial_listing: s3://{}/{} listing stopped after {} keys",
            bucket, prefix, outcome.listed
        );
    }

    let report = MirrorReport {
        bucket: config.bucket.clone(),
        prefix: config.prefix.clone(),
        discovered: progress.discovered(),
        completed: progress.completed(),
        listing_complete: outcome.complete,
    };
    info!(
        "mirror_finish: s3://{}/{} completed={}/{}",
        report.bucket, report.prefix, report.completed, report.discovered
    );
    Ok(report)
}

/// Run a mirror against S3 with the default fetcher settings and `tokio::fs`
pub async fn run_s3_mirror(
    client: Client,
    config: &MirrorConfig,
) -> Result<MirrorReport, MirrorError> {
    let lister = Arc::new(S3Lister::new(client.clone()));
    let fetcher = Arc::new(S3Fetcher::new(client));
    run_mirror(config, lister, fetcher, Arc::new(TokioFs)).await
}
