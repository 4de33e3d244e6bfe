use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::{build_service, AppConfig};
use crate::movies::{shared, InMemoryMovieStore, Movie};
use crate::runtime_config::RuntimeConfig;
use crate::seed::load_movies;
use crate::server::{HttpServer, ServerHandle, DEFAULT_MAX_BODY_BYTES};
use crate::validator::MovieValidator;

/// Seed file used when `--data` is not given.
pub const DEFAULT_DATA_PATH: &str = "data/movies.json";

/// Command-line interface for the movie API server
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "movies-api", version)]
#[command(about = "In-memory movie catalogue HTTP API", long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// JSON array of initial movies
    #[arg(long, env = "MOVIES_DATA")]
    pub data: Option<PathBuf>,

    /// Origin allowed to make cross-origin requests (repeat for several)
    #[arg(
        long = "allowed-origin",
        env = "MOVIES_ALLOWED_ORIGINS",
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,

    /// Largest accepted request body in bytes
    #[arg(long, env = "MOVIES_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl Cli {
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn app_config(&self, runtime: &RuntimeConfig) -> AppConfig {
        let allowed_origins: Vec<String> = self
            .allowed_origins
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        AppConfig {
            allowed_origins: (!allowed_origins.is_empty()).then_some(allowed_origins),
            max_body_bytes: self.max_body_bytes,
            stack_size: runtime.stack_size,
        }
    }

    /// Load the initial collection.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly given file is missing, or if any seed file is
    /// unreadable or invalid.
    pub fn load_seed(&self, validator: &MovieValidator) -> Result<Vec<Movie>> {
        let (path, explicit) = match &self.data {
            Some(path) => (path.as_path(), true),
            None => (Path::new(DEFAULT_DATA_PATH), false),
        };
        if !explicit && !path.exists() {
            warn!(path = %path.display(), "No seed file found, starting with an empty collection");
            return Ok(Vec::new());
        }
        load_movies(path, validator).with_context(|| format!("failed to load {}", path.display()))
    }
}

/// Start the server described by `cli` and block until it is told to stop.
///
/// # Errors
///
/// Returns any startup failure: invalid configuration, bad seed data, or a port
/// that cannot be bound.
pub fn run_cli(cli: Cli) -> Result<()> {
    let runtime = RuntimeConfig::from_env();
    runtime.apply();

    let validator = Arc::new(MovieValidator::new()?);
    let movies = cli.load_seed(&validator)?;
    let store = shared(InMemoryMovieStore::with_movies(movies));

    let service = build_service(&cli.app_config(&runtime), store, validator)?;
    let addr = cli.bind_addr();
    let handle = HttpServer(service)
        .start(addr.as_str())
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %handle.addr(), stack_size = runtime.stack_size, "movies-api ready");

    wait_for_shutdown(handle)
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    info!("movies-api stopped");
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server failed: {e:?}"))
}
