use std::collections::HashMap;

use http::Method;
use tracing::info;

use super::{CorsConfigError, CorsMiddleware, RouteCorsPolicy, DEFAULT_ALLOWED_ORIGINS};

/// Builder for [`CorsMiddleware`]
///
/// ```rust,ignore
/// use movies_api::middleware::{build_route_cors_map, CorsMiddlewareBuilder};
///
/// let cors = CorsMiddlewareBuilder::new()
///     .allowed_origins(&["https://app.example.com"])
///     .route_policies(build_route_cors_map(&routes))
///     .build()?;
/// ```
pub struct CorsMiddlewareBuilder {
    allowed_origins: Vec<String>,
    allowed_methods: Vec<Method>,
    route_policies: HashMap<String, RouteCorsPolicy>,
}

impl Default for CorsMiddlewareBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CorsMiddlewareBuilder {
    /// Start from the default allow-list and the `GET, POST, PATCH, DELETE`
    /// preflight method list. No route policies.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
            allowed_methods: vec![Method::GET, Method::POST, Method::PATCH, Method::DELETE],
            route_policies: HashMap::new(),
        }
    }

    /// Replace the allow-list.
    #[must_use]
    pub fn allowed_origins<S: AsRef<str>>(mut self, origins: &[S]) -> Self {
        self.allowed_origins = origins.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    #[must_use]
    pub fn route_policies(mut self, policies: HashMap<String, RouteCorsPolicy>) -> Self {
        self.route_policies = policies;
        self
    }

    /// Validate the allow-list and build the middleware.
    ///
    /// # Errors
    ///
    /// - [`CorsConfigError::WildcardOrigin`] if `*` is listed
    /// - [`CorsConfigError::InvalidOriginFormat`] if an entry is not a canonical
    ///   `scheme://host[:port]` origin
    pub fn build(self) -> Result<CorsMiddleware, CorsConfigError> {
        for origin in &self.allowed_origins {
            validate_origin_format(origin)?;
        }
        info!(
            allowed_origins = ?self.allowed_origins,
            route_policies = self.route_policies.len(),
            "CORS allow-list configured"
        );
        Ok(CorsMiddleware::new(
            self.allowed_origins,
            &self.allowed_methods,
            self.route_policies,
        ))
    }
}

/// An origin must round-trip through URL origin serialization unchanged, which
/// rules out paths, queries, credentials, trailing slashes and default ports.
fn validate_origin_format(origin: &str) -> Result<(), CorsConfigError> {
    if origin.trim() == "*" {
        return Err(CorsConfigError::WildcardOrigin);
    }
    let invalid = || CorsConfigError::InvalidOriginFormat {
        origin: origin.to_string(),
    };
    let url = url::Url::parse(origin).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if url.origin().ascii_serialization() != origin {
        return Err(invalid());
    }
    Ok(())
}
