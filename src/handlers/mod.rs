//! Route handlers for the `/movies` resource.
//!
//! Each handler is a plain function `(&HandlerRequest, &AppState) -> HandlerResponse`.
//! [`movie_routes`] is the route table (including each route's CORS policy) and
//! [`register_movie_handlers`] wires the handlers into a dispatcher.

pub mod create_movie;
pub mod delete_movie;
pub mod get_movie;
pub mod list_movies;
pub mod preflight_movie;
pub mod update_movie;

use http::Method;
use serde::Serialize;
use std::io;
use std::sync::{Arc, PoisonError, RwLockReadGuard, RwLockWriteGuard};
use tracing::error;

use crate::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
use crate::error::ApiError;
use crate::middleware::RouteCorsPolicy;
use crate::movies::{MovieStore, SharedMovieStore};
use crate::router::RouteMeta;
use crate::validator::MovieValidator;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedMovieStore,
    pub validator: Arc<MovieValidator>,
}

impl AppState {
    #[must_use]
    pub fn new(store: SharedMovieStore, validator: Arc<MovieValidator>) -> Self {
        Self { store, validator }
    }

    /// Read access to the store. A poisoned lock is recovered: the store only
    /// ever holds fully validated records.
    pub fn read_store(&self) -> RwLockReadGuard<'_, dyn MovieStore + 'static> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the store, held for a handler's whole read-modify-write.
    pub fn write_store(&self) -> RwLockWriteGuard<'_, dyn MovieStore + 'static> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The route table. Order only matters for log output.
#[must_use]
pub fn movie_routes() -> Vec<RouteMeta> {
    vec![
        RouteMeta::new(Method::GET, "/movies", "list_movies", RouteCorsPolicy::Echo),
        RouteMeta::new(Method::GET, "/movies/{id}", "get_movie", RouteCorsPolicy::Disabled),
        RouteMeta::new(Method::POST, "/movies", "create_movie", RouteCorsPolicy::Echo),
        RouteMeta::new(Method::PATCH, "/movies/{id}", "update_movie", RouteCorsPolicy::Echo),
        RouteMeta::new(Method::DELETE, "/movies/{id}", "delete_movie", RouteCorsPolicy::Echo),
        RouteMeta::new(
            Method::OPTIONS,
            "/movies/{id}",
            "preflight_movie",
            RouteCorsPolicy::Preflight,
        ),
    ]
}

/// Register every movie handler under the name used in [`movie_routes`].
///
/// # Errors
///
/// Returns the first coroutine spawn failure.
pub fn register_movie_handlers(dispatcher: &mut Dispatcher, state: &AppState) -> io::Result<()> {
    let handlers: [(&str, fn(&HandlerRequest, &AppState) -> HandlerResponse); 6] = [
        ("list_movies", list_movies::handle),
        ("get_movie", get_movie::handle),
        ("create_movie", create_movie::handle),
        ("update_movie", update_movie::handle),
        ("delete_movie", delete_movie::handle),
        ("preflight_movie", preflight_movie::handle),
    ];
    for (name, handler) in handlers {
        let state = state.clone();
        dispatcher.register_handler(name, move |req| handler(req, &state))?;
    }
    Ok(())
}

/// Serialize `value` as a JSON response body.
pub(crate) fn json_response<T: Serialize>(status: u16, value: &T) -> HandlerResponse {
    match serde_json::to_value(value) {
        Ok(body) => HandlerResponse::json(status, body),
        Err(e) => {
            error!(error = %e, "Failed to serialize response body");
            HandlerResponse::from(ApiError::Internal)
        }
    }
}

/// The `{id}` path parameter. Always present on routes that declare it.
pub(crate) fn movie_id(req: &HandlerRequest) -> &str {
    req.get_path_param("id").unwrap_or_default()
}
