//! Background graph reload task.

use super::store::JsonGraphStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Polls the graph file and swaps in rebuilt graphs.
///
/// The engine observes a swap through the store's rebuilt signal at the
/// start of the next turn.
pub struct GraphReloader {
    store: Arc<JsonGraphStore>,
    interval: Duration,
}

impl GraphReloader {
    pub fn new(store: Arc<JsonGraphStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run until `cancellation` fires
    pub fn spawn(self, cancellation: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(self.interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancellation.cancelled() => {
                        debug!("Graph reloader stopped");
                        return;
                    }
                    _ = tick.tick() => {
                        if let Err(e) = self.store.reload_if_changed().await {
                            warn!(
                                "Could not reload {}: {}",
                                self.store.graph_path().display(),
                                e
                            );
                        }
                    }
                }
            }
        })
    }
}
