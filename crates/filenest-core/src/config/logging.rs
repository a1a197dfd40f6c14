//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Controls the verbosity and output shape of `tracing` events.
///
/// Installing a subscriber is the host binary's job; library crates only
/// emit events against whatever is installed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Either `json` (machine-readable) or `pretty` (for local runs).
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "json".into()
}
