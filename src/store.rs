// Latest-snapshot store shared with consumers

use crate::models::Snapshot;
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the most recently published [`Snapshot`].
///
/// Publication replaces the whole value; readers only ever hold the lock for
/// a copy, so they see either the previous or the new snapshot.
#[derive(Debug, Clone)]
pub struct MetricsStore {
    tx: Arc<watch::Sender<Snapshot>>,
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Snapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn latest(&self) -> Snapshot {
        *self.tx.borrow()
    }

    /// Receiver notified on every publication.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    pub fn publish(&self, snapshot: Snapshot) {
        self.tx.send_replace(snapshot);
    }
}
