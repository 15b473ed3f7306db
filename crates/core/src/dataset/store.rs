use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::DatasetSnapshot;

/// Shared holder of the current [`DatasetSnapshot`]. Clone-cheap.
///
/// Built once at the composition root and handed to the refresher and to
/// request handlers. Reads never block on a refresh in progress: they get
/// whichever snapshot was last published.
#[derive(Clone, Debug)]
pub struct DatasetStore {
    tx: Arc<watch::Sender<Arc<DatasetSnapshot>>>,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore {
    /// Create a store holding an empty snapshot.
    pub fn new() -> Self {
        Self::with_snapshot(DatasetSnapshot::empty())
    }

    pub fn with_snapshot(snapshot: DatasetSnapshot) -> Self {
        Self { tx: Arc::new(watch::Sender::new(Arc::new(snapshot))) }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<DatasetSnapshot> {
        self.tx.borrow().clone()
    }

    /// Whether the current snapshot may be served without refreshing.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.tx.borrow().is_fresh(ttl)
    }

    /// Replace the current snapshot in one step and return the published handle.
    ///
    /// Only the refresher should call this, while holding its refresh lock.
    pub fn publish(&self, snapshot: DatasetSnapshot) -> Arc<DatasetSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.tx.send_replace(snapshot.clone());
        snapshot
    }
}
