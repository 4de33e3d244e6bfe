//! # Router Module
//!
//! Path matching and route resolution. Each route is declared as a [`RouteMeta`]
//! (method, path pattern such as `/movies/{id}`, handler name and CORS policy) and
//! compiled into a regex at startup.
//!
//! ## Matching
//!
//! 1. **Compilation**: `{param}` segments become `([^/]+)` capture groups; literal
//!    segments are escaped.
//! 2. **Matching**: an incoming method + path is tested against the compiled routes
//!    in declaration order. The first hit yields a [`RouteMatch`] carrying the route
//!    metadata and the extracted path parameters. No hit means 404.
//!
//! ```rust,ignore
//! use http::Method;
//! use movies_api::router::{RouteMeta, Router};
//! use movies_api::middleware::RouteCorsPolicy;
//!
//! let router = Router::new(vec![RouteMeta::new(
//!     Method::GET,
//!     "/movies/{id}",
//!     "get_movie",
//!     RouteCorsPolicy::Disabled,
//! )])?;
//! let m = router.route(Method::GET, "/movies/42").unwrap();
//! assert_eq!(m.get_path_param("id"), Some("42"));
//! ```

mod core;

pub use core::{ParamVec, RouteMatch, RouteMeta, Router, MAX_INLINE_PARAMS};
