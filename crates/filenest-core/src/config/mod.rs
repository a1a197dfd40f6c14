//! Layered application configuration.
//!
//! Settings come from TOML files merged through the `config` crate, with
//! `FILENEST_*` environment variables taking precedence over both. One
//! sub-module per settings section.

pub mod database;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// The fully merged configuration tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Merge `config/default.toml`, `config/{env}.toml` and `FILENEST_*`
    /// environment variables, in increasing precedence.
    ///
    /// Missing files are skipped; `FILENEST_DATABASE__URL` style variables
    /// use `__` as the section separator.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let layered = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FILENEST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(layered.try_deserialize()?)
    }
}
