//! # Runtime Configuration
//!
//! Environment-only settings for the `may` coroutine runtime.
//!
//! ## `MOVIES_STACK_SIZE`
//!
//! Stack size for coroutines (connection handlers and handler coroutines).
//! Accepts decimal (`32768`) or hexadecimal (`0x8000`). Unparseable values fall
//! back to the default with a warning.
//!
//! Default: `0x8000` (32 KB)
//!
//! ```bash
//! export MOVIES_STACK_SIZE=0x10000
//! movies-api
//! ```

use std::env;
use tracing::warn;

/// Stack size used when `MOVIES_STACK_SIZE` is unset or invalid.
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_value(env::var("MOVIES_STACK_SIZE").ok().as_deref())
    }

    fn from_value(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match parse_stack_size(raw) {
            Some(stack_size) => RuntimeConfig { stack_size },
            None => {
                warn!(value = %raw, default = DEFAULT_STACK_SIZE, "Invalid MOVIES_STACK_SIZE, using default");
                Self::default()
            }
        }
    }

    /// Apply the settings to the global `may` configuration.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

fn parse_stack_size(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    };
    parsed.filter(|size| *size > 0)
}
