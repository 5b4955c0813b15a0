use std::time::Duration;

use crate::dispatcher::HandlerResponse;
use crate::server::ParsedRequest;

pub trait Middleware: Send + Sync {
    fn before(&self, _req: &ParsedRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &ParsedRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
