use std::time::Duration;

use tracing::info;

use super::Middleware;
use crate::dispatcher::HandlerResponse;
use crate::server::ParsedRequest;

/// Access logging, disabled in production mode.
///
/// Always declines; the log line is emitted from the `after` hook once the
/// final status is known.
pub struct AccessLogMiddleware {
    enabled: bool,
}

impl AccessLogMiddleware {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Middleware for AccessLogMiddleware {
    fn after(&self, req: &ParsedRequest, res: &mut HandlerResponse, latency: Duration) {
        if self.enabled {
            info!(
                method = %req.method,
                path = %req.path,
                status = res.status,
                latency_ms = latency.as_millis() as u64,
                "request"
            );
        }
    }
}
