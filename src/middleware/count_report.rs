use std::sync::Arc;

use serde_json::json;
use tracing::error;

use super::Middleware;
use crate::counter::VisitCounter;
use crate::dispatcher::HandlerResponse;
use crate::server::ParsedRequest;

/// Terminal stage for `GET /count`: reports the persisted visit count.
pub struct CountReportMiddleware {
    counter: Arc<VisitCounter>,
}

impl CountReportMiddleware {
    #[must_use]
    pub fn new(counter: Arc<VisitCounter>) -> Self {
        Self { counter }
    }
}

impl Middleware for CountReportMiddleware {
    fn before(&self, req: &ParsedRequest) -> Option<HandlerResponse> {
        if req.method != "GET" || req.path != "/count" {
            return None;
        }
        match self.counter.read() {
            Ok(count) => Some(HandlerResponse::json(
                200,
                json!({ "success": true, "count": count }),
            )),
            Err(e) => {
                error!(error = %e, "visit counter read failed");
                Some(HandlerResponse::error(500, &format!("visit counter unavailable: {e}")))
            }
        }
    }
}
