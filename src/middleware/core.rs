use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Hook into the dispatch pipeline.
///
/// `before` may answer early by returning a response; the handler is then skipped
/// but every `after` hook still runs.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
