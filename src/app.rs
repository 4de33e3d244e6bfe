//! Assembly of the running service: store, validator, routes, CORS gate,
//! dispatcher and HTTP service.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::dispatcher::Dispatcher;
use crate::handlers::{movie_routes, register_movie_handlers, AppState};
use crate::middleware::{build_route_cors_map, CorsMiddlewareBuilder, TracingMiddleware};
use crate::movies::SharedMovieStore;
use crate::router::Router;
use crate::runtime_config::DEFAULT_STACK_SIZE;
use crate::server::{AppService, DEFAULT_MAX_BODY_BYTES};
use crate::validator::MovieValidator;

/// Settings that shape the service, independent of where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// CORS allow-list; `None` selects the built-in default list
    pub allowed_origins: Option<Vec<String>>,
    pub max_body_bytes: usize,
    /// Stack size for handler coroutines
    pub stack_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allowed_origins: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

/// Build the HTTP service over `store`.
///
/// # Errors
///
/// Fails on an invalid CORS allow-list, a route pattern that does not compile,
/// or a handler coroutine that cannot be spawned.
pub fn build_service(
    config: &AppConfig,
    store: SharedMovieStore,
    validator: Arc<MovieValidator>,
) -> Result<AppService> {
    let routes = movie_routes();

    let mut cors = CorsMiddlewareBuilder::new().route_policies(build_route_cors_map(&routes));
    if let Some(origins) = &config.allowed_origins {
        cors = cors.allowed_origins(origins.as_slice());
    }
    let cors = cors.build()?;

    let router = Router::new(routes).context("failed to compile route table")?;

    let mut dispatcher = Dispatcher::with_stack_size(config.stack_size);
    dispatcher.add_middleware(Arc::new(TracingMiddleware));
    dispatcher.add_middleware(Arc::new(cors));
    register_movie_handlers(&mut dispatcher, &AppState::new(store, validator))
        .context("failed to start handler coroutines")?;

    info!(
        handlers = dispatcher.handlers.len(),
        max_body_bytes = config.max_body_bytes,
        "Service assembled"
    );
    Ok(AppService::new(router, dispatcher).with_max_body_bytes(config.max_body_bytes))
}
