use std::sync::atomic::{AtomicU64, Ordering};

/// Shared discovered/completed counters for one run.
///
/// The lister bumps `discovered` before queueing a key, so `completed`
/// never overtakes it.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    discovered: AtomicU64,
    completed: AtomicU64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_discovered(&self) -> u64 {
        self.discovered.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns the new completed count and the current discovered snapshot
    pub fn record_completed(&self) -> (u64, u64) {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let discovered = self.discovered.load(Ordering::SeqCst);
        (completed, discovered)
    }

    pub fn discovered(&self) -> u64 {
        self.discovered.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::ProgressTracker;
    use std::sync::Arc;

    #[test]
    fn completed_reports_discovered_snapshot() {
        let progress = ProgressTracker::new();
        progress.record_discovered();
        progress.record_discovered();

        assert_eq!(progress.record_completed(), (1, 2));
        assert_eq!(progress.completed(), 1);
        assert_eq!(progress.discovered(), 2);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let progress = Arc::new(ProgressTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let progress = progress.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        progress.record_discovered();
                        progress.record_completed();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(progress.discovered(), 8000);
        assert_eq!(progress.completed(), 8000);
    }
}
