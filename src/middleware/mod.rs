//! Middleware run by the dispatcher around every handler call.
//!
//! - [`CorsMiddleware`] applies the per-route CORS policy table.
//! - [`TracingMiddleware`] logs request start and completion with the request id.

mod core;
mod cors;
mod tracing;

pub use core::Middleware;
pub use cors::{
    build_route_cors_map, CorsConfigError, CorsMiddleware, CorsMiddlewareBuilder,
    RouteCorsPolicy, DEFAULT_ALLOWED_ORIGINS,
};
pub use tracing::TracingMiddleware;
