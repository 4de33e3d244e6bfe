//! `OPTIONS /movies/{id}`
//!
//! Always 200 with no body. The CORS headers are added by the CORS middleware
//! according to the route's `Preflight` policy.

use super::AppState;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

pub fn handle(_req: &HandlerRequest, _state: &AppState) -> HandlerResponse {
    HandlerResponse::empty(200)
}
