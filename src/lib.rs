//! # movies-api
//!
//! An in-memory movie catalogue served over HTTP on the `may` coroutine
//! runtime. The collection is seeded from a JSON file at startup and lives only
//! in process memory: every change is lost on restart.
//!
//! ## Request flow
//!
//! ```text
//! may_minihttp ─► server::AppService
//!                   ├─ parse headers, query and JSON body (size-limited)
//!                   ├─ GET /health
//!                   ├─ router::Router        (method + path pattern → handler name)
//!                   └─ dispatcher::Dispatcher
//!                        ├─ middleware before (tracing)
//!                        ├─ handler coroutine (handlers::*)
//!                        └─ middleware after  (tracing, CORS allow-list)
//! ```
//!
//! ## Modules
//!
//! - **[`movies`]** - the `Movie` record, `Genre` set and the `MovieStore` abstraction
//! - **[`validator`]** - JSON Schema validation of full and partial movie bodies
//! - **[`handlers`]** - one handler per route, sharing an [`handlers::AppState`]
//! - **[`router`]** / **[`dispatcher`]** / **[`middleware`]** / **[`server`]** - HTTP plumbing
//! - **[`seed`]** - loading the initial collection
//! - **[`app`]** - wiring it all into a runnable service
//! - **[`cli`]**, **[`logging`]**, **[`runtime_config`]** - process configuration
//!
//! ## Embedding
//!
//! ```no_run
//! use std::sync::Arc;
//! use movies_api::app::{build_service, AppConfig};
//! use movies_api::movies::{shared, InMemoryMovieStore};
//! use movies_api::server::HttpServer;
//! use movies_api::validator::MovieValidator;
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = shared(InMemoryMovieStore::new());
//! let validator = Arc::new(MovieValidator::new()?);
//! let service = build_service(&AppConfig::default(), store, validator)?;
//! let handle = HttpServer(service).start("127.0.0.1:3000")?;
//! handle.wait_ready()?;
//! # handle.stop();
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod movies;
pub mod router;
pub mod runtime_config;
pub mod seed;
pub mod server;
pub mod validator;
