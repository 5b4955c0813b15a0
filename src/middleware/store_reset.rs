use std::sync::{Arc, RwLock};

use tracing::debug;

use super::Middleware;
use crate::dispatcher::HandlerResponse;
use crate::fixture::Dataset;
use crate::server::ParsedRequest;
use crate::store::Store;

/// Replaces the working store with a fresh fixture snapshot before every
/// non-root request, so each request observes pristine data.
///
/// The root path is exempt. The replacement is last-writer-wins; mutations
/// from an earlier request generation are discarded by design.
pub struct StoreResetMiddleware {
    dataset: Arc<Dataset>,
    store: Arc<RwLock<Store>>,
}

impl StoreResetMiddleware {
    #[must_use]
    pub fn new(dataset: Arc<Dataset>, store: Arc<RwLock<Store>>) -> Self {
        Self { dataset, store }
    }
}

impl Middleware for StoreResetMiddleware {
    fn before(&self, req: &ParsedRequest) -> Option<HandlerResponse> {
        if req.path == "/" {
            return None;
        }
        *self.store.write().unwrap() = self.dataset.snapshot();
        debug!(path = %req.path, "working store reset to fixture snapshot");
        None
    }
}
