//! # CLI Module
//!
//! Command-line entry point of the `movies-api` binary. Every flag can also be
//! given through the environment:
//!
//! | Flag | Env | Default |
//! |---|---|---|
//! | `--host` | `HOST` | `0.0.0.0` |
//! | `--port` | `PORT` | `3000` |
//! | `--data` | `MOVIES_DATA` | `data/movies.json` |
//! | `--allowed-origin` (repeatable) | `MOVIES_ALLOWED_ORIGINS` (comma separated) | built-in allow-list |
//! | `--max-body-bytes` | `MOVIES_MAX_BODY_BYTES` | `102400` |
//!
//! A missing seed file is only tolerated when `--data` was not given: the
//! service then starts with an empty collection and logs a warning.
//!
//! ```bash
//! PORT=8080 movies-api --allowed-origin https://app.example.com
//! ```

mod commands;


pub use commands::{run_cli, Cli, DEFAULT_DATA_PATH};
