use std::collections::HashMap;

use crate::router::RouteMeta;

/// How the CORS gate treats a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteCorsPolicy {
    /// Never emit CORS headers.
    #[default]
    Disabled,
    /// Echo an allow-listed `Origin` back in `Access-Control-Allow-Origin`.
    Echo,
    /// Preflight answer: echo an allow-listed origin and, when the origin is
    /// absent or allowed, advertise the allowed methods.
    Preflight,
}

/// Build the handler-name → policy lookup used by the CORS middleware.
///
/// Called once at startup. Routes missing from the map are treated as
/// [`RouteCorsPolicy::Disabled`].
pub fn build_route_cors_map(routes: &[RouteMeta]) -> HashMap<String, RouteCorsPolicy> {
    routes
        .iter()
        .map(|route| (route.handler_name.to_string(), route.cors))
        .collect()
}
