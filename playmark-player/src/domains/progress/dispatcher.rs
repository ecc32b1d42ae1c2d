use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

/// Counters for fire-and-forget writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub attempted: u64,
    pub delivered: u64,
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    attempted: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

/// Runs progress writes in the background without blocking the caller.
///
/// Drop policy: a failed write is logged at `warn`, counted as dropped and
/// forgotten. Nothing is retried and nothing reaches the viewer. Writes are
/// not ordered against each other.
#[derive(Debug, Clone, Default)]
pub struct BestEffortDispatcher {
    tracker: TaskTracker,
    counters: Arc<Counters>,
}

impl BestEffortDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch<F>(&self, label: &'static str, write: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.counters.attempted.fetch_add(1, Ordering::Relaxed);

        // Teardown can run from a plain Drop with no runtime around.
        let Ok(handle) = Handle::try_current() else {
            log::warn!("[Progress] No async runtime; dropping {} write", label);
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        };

        let counters = Arc::clone(&self.counters);
        self.tracker.spawn_on(
            async move {
                match write.await {
                    Ok(()) => {
                        counters.delivered.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        log::warn!("[Progress] {} write dropped: {:#}", label, e);
                        counters.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                }
            },
            &handle,
        );
    }

    pub fn stats(&self) -> DeliveryStats {
        DeliveryStats {
            attempted: self.counters.attempted.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }

    /// Number of writes still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every write dispatched so far.
    pub async fn settle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failures_are_counted_not_raised() {
        let dispatcher = BestEffortDispatcher::new();
        dispatcher.dispatch("heartbeat", async { Ok(()) });
        dispatcher.dispatch("heartbeat", async {
            Err(anyhow::anyhow!("connection refused"))
        });
        dispatcher.settle().await;

        assert_eq!(
            dispatcher.stats(),
            DeliveryStats {
                attempted: 2,
                delivered: 1,
                dropped: 1,
            }
        );
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[test]
    fn without_runtime_the_write_is_dropped() {
        let dispatcher = BestEffortDispatcher::new();
        dispatcher.dispatch("final-position", async { Ok(()) });

        let stats = dispatcher.stats();
        assert_eq!(stats.attempted, 1);
        assert_eq!(stats.dropped, 1);
    }

    #[tokio::test]
    async fn settle_can_be_called_repeatedly() {
        let dispatcher = BestEffortDispatcher::new();
        dispatcher.dispatch("heartbeat", async { Ok(()) });
        dispatcher.settle().await;
        dispatcher.dispatch("heartbeat", async { Ok(()) });
        dispatcher.settle().await;

        assert_eq!(dispatcher.stats().delivered, 2);
    }
}
