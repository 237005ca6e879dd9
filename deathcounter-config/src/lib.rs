//! # Death Counter Configuration
//!
//! Layered configuration for the death counter: compiled-in defaults,
//! YAML files and `DEATHCOUNTER_*` environment variables, validated before
//! anything else starts.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod event_bus;
mod error;
mod storage;
mod telemetry;
mod validation;

pub use event_bus::EventBusConfig;
pub use error::ConfigError;
pub use storage::StorageConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/deathcounter.yaml";
const ENV_PREFIX: &str = "DEATHCOUNTER_";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct DeathCounterConfig {
    /// Data file location.
    #[validate(nested)]
    #[serde(default)]
    pub storage: StorageConfig,

    /// Host event queue sizing.
    #[validate(nested)]
    #[serde(default)]
    pub event_bus: EventBusConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl DeathCounterConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/deathcounter.yaml` - Base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - `DEATHCOUNTER_ENV` specific overrides.
    /// 4. `DEATHCOUNTER_*` environment variables, `__` separating sections.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(DeathCounterConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("DEATHCOUNTER_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment)
    }

    /// Load configuration from a specific file, still honouring env overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment = Figment::from(Serialized::defaults(DeathCounterConfig::default()))
            .merge(Yaml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
