//! Expiration Sweeper Task
//!
//! Background task that periodically purges expired registry entries.
//! Reads already filter expired entries on their own; the sweep only bounds
//! memory held by keys that are written once and never read again.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::storage::Registry;

/// Shortest interval the sweeper ticks at; smaller requests are raised to it.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

/// Handle to a running sweeper.
///
/// Use [`SweeperHandle::shutdown`] to stop the task and wait for it to finish.
/// Dropping the handle also stops the task, without waiting.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits until it has exited.
    pub async fn shutdown(self) {
        // Receiver already gone means the task has finished
        let _ = self.shutdown_tx.send(true);
        if let Err(err) = self.task.await {
            if !err.is_cancelled() {
                warn!("Sweeper task ended abnormally: {}", err);
            }
        }
    }

    /// Stops the sweeper without waiting for it.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that purges expired entries every `interval`.
///
/// The first pass runs one full interval after spawning. A pass that panics
/// is logged and the loop keeps going. Intervals below [`MIN_SWEEP_INTERVAL`]
/// (including zero) are raised to it.
///
/// # Example
/// ```ignore
/// let registry = Registry::new(Duration::from_secs(300));
/// let sweeper = spawn_sweeper(registry.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.shutdown().await;
/// ```
pub fn spawn_sweeper(registry: Registry, interval: Duration) -> SweeperHandle {
    if interval < MIN_SWEEP_INTERVAL {
        warn!(
            "Sweep interval {:?} is too short, using {:?}",
            interval, MIN_SWEEP_INTERVAL
        );
    }
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Starting expiration sweeper with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        // Skip the immediate first tick
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => sweep(&registry),
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Expiration sweeper stopped");
    });

    SweeperHandle { shutdown_tx, task }
}

fn sweep(registry: &Registry) {
    match panic::catch_unwind(AssertUnwindSafe(|| registry.purge_expired())) {
        Ok(0) => debug!("Expiration sweep: no expired entries found"),
        Ok(removed) => info!("Expiration sweep: removed {} expired entries", removed),
        Err(_) => warn!("Expiration sweep aborted by a panic, retrying next tick"),
    }
}
