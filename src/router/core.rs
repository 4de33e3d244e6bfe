use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::middleware::RouteCorsPolicy;

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage for the hot path. Names are shared with the route table.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Static description of one route.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: Method,
    /// Pattern with `{param}` placeholders, e.g. `/movies/{id}`
    pub path_pattern: Arc<str>,
    /// Name under which the handler is registered with the dispatcher
    pub handler_name: Arc<str>,
    /// CORS treatment applied by the CORS middleware
    pub cors: RouteCorsPolicy,
}

impl RouteMeta {
    #[must_use]
    pub fn new(method: Method, path_pattern: &str, handler_name: &str, cors: RouteCorsPolicy) -> Self {
        Self {
            method,
            path_pattern: Arc::from(path_pattern),
            handler_name: Arc::from(handler_name),
            cors,
        }
    }
}

/// Result of successfully matching a request to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<RouteMeta>,
    /// Path parameters extracted from the URL (e.g., `{id}` → `("id", "123")`)
    pub path_params: ParamVec,
    pub handler_name: String,
    /// Query string parameters (populated by the server)
    pub query_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name. Last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

struct CompiledRoute {
    method: Method,
    regex: Regex,
    meta: Arc<RouteMeta>,
    param_names: Vec<Arc<str>>,
}

/// Regex-based router over a fixed route table
#[derive(Clone)]
pub struct Router {
    routes: Arc<[CompiledRoute]>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.routes
                    .iter()
                    .map(|r| format!("{} {} -> {}", r.method, r.meta.path_pattern, r.meta.handler_name)),
            )
            .finish()
    }
}

impl Router {
    /// Compile a routing table.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a path pattern cannot be compiled.
    pub fn new(routes: Vec<RouteMeta>) -> Result<Self, regex::Error> {
        let compiled = routes
            .into_iter()
            .map(|route| {
                let (regex, param_names) = Self::path_to_regex(&route.path_pattern)?;
                Ok(CompiledRoute {
                    method: route.method.clone(),
                    regex,
                    meta: Arc::new(route),
                    param_names: param_names.into_iter().map(Arc::from).collect(),
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let routes_summary: Vec<String> = compiled
            .iter()
            .map(|r| format!("{} {}", r.method, r.meta.path_pattern))
            .collect();
        info!(
            routes_count = compiled.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Self {
            routes: compiled.into(),
        })
    }

    /// All route metadata in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteMeta> {
        self.routes.iter().map(|r| r.meta.as_ref())
    }

    /// Match an HTTP request to a route.
    ///
    /// `path` must not include the query string. `HEAD` is served by `GET` routes.
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        for route in self.routes.iter() {
            let method_matches = route.method == method
                || (method == Method::HEAD && route.method == Method::GET);
            if !method_matches {
                continue;
            }
            let Some(caps) = route.regex.captures(path) else {
                continue;
            };

            let mut path_params = ParamVec::new();
            for (idx, name) in route.param_names.iter().enumerate() {
                if let Some(value) = caps.get(idx + 1) {
                    path_params.push((Arc::clone(name), value.as_str().to_string()));
                }
            }

            info!(
                method = %method,
                path = %path,
                handler_name = %route.meta.handler_name,
                route_pattern = %route.meta.path_pattern,
                path_params = ?path_params,
                "Route matched"
            );

            return Some(RouteMatch {
                route: Arc::clone(&route.meta),
                path_params,
                handler_name: route.meta.handler_name.to_string(),
                query_params: ParamVec::new(),
            });
        }

        warn!(method = %method, path = %path, "No route matched");
        None
    }

    /// Convert a path pattern to an anchored regex and its parameter names.
    ///
    /// `/movies/{id}` becomes `^/movies/([^/]+)/?$` with `["id"]`; one trailing
    /// slash is tolerated.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<String>), regex::Error> {
        if path == "/" {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let param_name = segment
                    .trim_start_matches('{')
                    .trim_end_matches('}')
                    .to_string();
                pattern.push_str("/([^/]+)");
                param_names.push(param_name);
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push_str("/?$");
        Ok((Regex::new(&pattern)?, param_names))
    }
}
