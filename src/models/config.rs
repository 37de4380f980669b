use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime settings for the bootstrap binary.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    /// How long a connection waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    /// Layers `config/default.yaml` (optional) under `APP__*` environment
    /// variables, e.g. `APP__DATABASE_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config/default")
    }

    /// Same as [`Self::load`] with an explicit base file (extension optional).
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("busy_timeout_ms", 5000)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}
