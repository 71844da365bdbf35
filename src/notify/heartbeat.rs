//! Periodic "still running" cue tied to the crawl lifetime.
//!
//! The heartbeat has no idea how long a harvest takes; it just ticks
//! until it is told to stop. Stopping waits for the task to wind down,
//! so no cue lands after the final summary.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a running heartbeat task.
pub struct Heartbeat {
    stop: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl Heartbeat {
    /// Fire `on_tick` every `interval` until stopped.
    ///
    /// The first tick comes one full interval after start. `on_tick` runs
    /// on the heartbeat task, so it should hand slow work (like speech)
    /// off to its own task.
    pub fn start<F>(interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let stop = Arc::new(Notify::new());
        let stop_signal = Arc::clone(&stop);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A fresh interval yields immediately; swallow that tick.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = stop_signal.notified() => break,
                    _ = ticker.tick() => {
                        debug!("heartbeat tick");
                        on_tick();
                    }
                }
            }
        });
        Self { stop, handle }
    }

    /// Signal the task and wait for it to finish.
    pub async fn stop(self) {
        self.stop.notify_one();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[tokio::test]
    async fn test_heartbeat_stops_promptly() {
        // Interval far beyond the test's lifetime: no tick ever fires,
        // stop must still return right away.
        let hb = Heartbeat::start(Duration::from_secs(60), || {});
        let started = Instant::now();
        hb.stop().await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_heartbeat_ticks_at_cadence() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let hb = Heartbeat::start(Duration::from_millis(25), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(110)).await;
        hb.stop().await;

        let ticks = count.load(Ordering::SeqCst);
        assert!((2..=6).contains(&ticks), "expected a few ticks, got {ticks}");
    }
}
