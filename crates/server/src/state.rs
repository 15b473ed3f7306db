//! Shared handler state.

use std::sync::Arc;

use msgsearch_client::{PageFetcher, Refresher};
use msgsearch_core::{DatasetSnapshot, DatasetStore, Error};

/// Upstream source as seen by the server; boxed so tests can swap in a fake.
pub type DynFetcher = Arc<dyn PageFetcher>;

/// State handed to every handler. Clone-cheap.
#[derive(Clone)]
pub struct AppState {
    refresher: Arc<Refresher<DynFetcher>>,
}

impl AppState {
    pub fn new(refresher: Refresher<DynFetcher>) -> Self {
        Self { refresher: Arc::new(refresher) }
    }

    pub fn store(&self) -> &DatasetStore {
        self.refresher.store()
    }

    pub fn is_fresh(&self) -> bool {
        self.refresher.is_fresh()
    }

    /// Refresh if needed and return the snapshot to serve.
    ///
    /// The refresh runs on its own task so a caller that goes away (client
    /// disconnect, request timeout) does not abandon a fetch halfway.
    pub async fn refresh(&self, force: bool) -> Result<Arc<DatasetSnapshot>, Error> {
        let refresher = self.refresher.clone();
        tokio::spawn(async move { refresher.refresh(force).await })
            .await
            .map_err(|e| Error::RefreshFailed(format!("refresh task failed: {e}")))?
            .map_err(Error::from)
    }
}
