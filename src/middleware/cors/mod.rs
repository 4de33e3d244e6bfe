//! CORS policy gate.
//!
//! The allow-list is fixed at startup. Each route carries a [`RouteCorsPolicy`];
//! the middleware looks it up by handler name and decorates the handler's response
//! in `after`. It never changes the status or body: a request from a foreign
//! origin gets the same answer as any other, only without the CORS headers, and
//! the browser does the blocking.
//!
//! | Origin header | `Echo` | `Preflight` | `Disabled` |
//! |---|---|---|---|
//! | absent | nothing | `Allow-Methods` | nothing |
//! | allow-listed | `Allow-Origin` + `Vary` | `Allow-Origin` + `Vary` + `Allow-Methods` | nothing |
//! | other | nothing | nothing | nothing |

mod builder;
mod error;
mod route_config;

pub use builder::CorsMiddlewareBuilder;
pub use error::CorsConfigError;
pub use route_config::{build_route_cors_map, RouteCorsPolicy};

use std::collections::HashMap;
use std::time::Duration;

use http::Method;
use tracing::{debug, warn};

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::middleware::Middleware;

/// Origins allowed when none are configured.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://localhost:3000",
    "https://localhost:3001",
    "http://localhost:8080",
];

/// Applies the per-route CORS policy to every dispatched response.
#[derive(Debug, Clone)]
pub struct CorsMiddleware {
    allowed_origins: Vec<String>,
    /// Pre-joined `Access-Control-Allow-Methods` value
    allowed_methods: String,
    /// Route-specific policies keyed by handler name
    route_policies: HashMap<String, RouteCorsPolicy>,
}

impl CorsMiddleware {
    /// Use [`CorsMiddlewareBuilder`] to get origin validation.
    pub(crate) fn new(
        allowed_origins: Vec<String>,
        allowed_methods: &[Method],
        route_policies: HashMap<String, RouteCorsPolicy>,
    ) -> Self {
        let allowed_methods = allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            allowed_origins,
            allowed_methods,
            route_policies,
        }
    }

    /// Exact, case-sensitive membership test.
    #[must_use]
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }

    #[must_use]
    pub fn policy_for(&self, handler_name: &str) -> RouteCorsPolicy {
        self.route_policies
            .get(handler_name)
            .copied()
            .unwrap_or_default()
    }

    /// Decorate `res` for a request that carried `origin` on a route with `policy`.
    pub fn apply(&self, policy: RouteCorsPolicy, origin: Option<&str>, res: &mut HandlerResponse) {
        if policy == RouteCorsPolicy::Disabled {
            return;
        }

        let origin_allowed = match origin {
            None => true,
            Some(o) if self.is_origin_allowed(o) => {
                res.set_header("access-control-allow-origin", o.to_string());
                res.set_header("vary", "Origin".to_string());
                true
            }
            Some(o) => {
                warn!(origin = %o, "CORS: origin not in allow-list, headers omitted");
                false
            }
        };

        if policy == RouteCorsPolicy::Preflight && origin_allowed {
            res.set_header("access-control-allow-methods", self.allowed_methods.clone());
        }
    }
}

impl Middleware for CorsMiddleware {
    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        let policy = self.policy_for(&req.handler_name);
        debug!(
            request_id = %req.request_id,
            handler = %req.handler_name,
            policy = ?policy,
            "CORS policy applied"
        );
        self.apply(policy, req.get_header("origin"), res);
    }
}
