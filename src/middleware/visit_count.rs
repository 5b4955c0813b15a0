use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};

use super::Middleware;
use crate::counter::VisitCounter;
use crate::dispatcher::HandlerResponse;
use crate::server::ParsedRequest;

// Prefix match on the six monitored resource names; any sub-path or query
// under a resource name counts.
static MONITORED: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^/(posts|comments|albums|photos|todos|users)").unwrap()
});

/// Counts requests to the monitored resource prefixes.
///
/// Always declines on success so the request continues down the chain; a
/// counter I/O or parse failure handles the request with a 500 instead.
pub struct VisitCountMiddleware {
    counter: Arc<VisitCounter>,
}

impl VisitCountMiddleware {
    #[must_use]
    pub fn new(counter: Arc<VisitCounter>) -> Self {
        Self { counter }
    }
}

impl Middleware for VisitCountMiddleware {
    fn before(&self, req: &ParsedRequest) -> Option<HandlerResponse> {
        if !MONITORED.is_match(&req.path) {
            return None;
        }
        match self.counter.increment_and_persist() {
            Ok(count) => {
                debug!(path = %req.path, count, "visit counted");
                None
            }
            Err(e) => {
                error!(path = %req.path, error = %e, "visit counter update failed");
                Some(HandlerResponse::error(500, &format!("visit counter unavailable: {e}")))
            }
        }
    }
}
