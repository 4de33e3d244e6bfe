//! Structured logging setup.
//!
//! Everything in the crate logs through `tracing`; this module installs the
//! subscriber. Output is JSON (production) or pretty (development), filtered by an
//! `EnvFilter`. With async logging enabled, events are written by a background
//! thread via `tracing-appender`, and the returned [`WorkerGuard`] must be held
//! until shutdown so buffered lines get flushed.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `MOVIES_LOG_LEVEL` | `info` | base level (`RUST_LOG` overrides) |
//! | `MOVIES_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `MOVIES_LOG_TARGET_FILTER` | unset | extra comma-separated directives |
//! | `MOVIES_LOG_INCLUDE_LOCATION` | `false` | add file and line |
//! | `MOVIES_LOG_ASYNC` | `false` | non-blocking stdout writer |

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra `EnvFilter` directives, comma-separated
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
    /// Write through a background thread
    pub async_logging: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            target_filter: None,
            include_location: false,
            async_logging: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|s| s.trim().to_lowercase().parse().ok())
                .unwrap_or(default)
        };
        Self {
            log_level: lookup("MOVIES_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("MOVIES_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: lookup("MOVIES_LOG_TARGET_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: flag("MOVIES_LOG_INCLUDE_LOCATION", defaults.include_location),
            async_logging: flag("MOVIES_LOG_ASYNC", defaults.async_logging),
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        // Connection-level chatter from the HTTP server stays out of the logs.
        env_filter = env_filter.add_directive(
            "may_minihttp=warn"
                .parse()
                .context("invalid built-in log directive")?,
        );

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                let directive = filter
                    .parse()
                    .with_context(|| format!("invalid log filter directive '{filter}'"))?;
                env_filter = env_filter.add_directive(directive);
            }
        }
        Ok(env_filter)
    }
}

fn fmt_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    }
}

/// Install the global subscriber.
///
/// Returns the flush guard when async logging is enabled; keep it alive for the
/// life of the process.
///
/// # Errors
///
/// Fails on an invalid filter directive or if a global subscriber is already set.
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry().with(config.env_filter()?);

    if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
        registry
            .with(fmt_layer(config, non_blocking))
            .try_init()
            .context("Failed to initialize async logging")?;
        Ok(Some(guard))
    } else {
        registry
            .with(fmt_layer(config, std::io::stdout))
            .try_init()
            .context("Failed to initialize logging")?;
        Ok(None)
    }
}
