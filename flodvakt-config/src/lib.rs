//! # Flodvakt Configuration System
//!
//! Hierarchical configuration for the traffic simulator. Every value has a
//! default, so a process started with no files and no environment behaves
//! exactly like the stock simulator.
//!
//! ## Features
//! - **Unified Configuration**: one tree for server, generator, capture and telemetry
//! - **Validation**: runtime validation of every tunable before it reaches the engine
//! - **Environment Awareness**: `FLODVAKT_ENV` overlays and `FLODVAKT_*` overrides

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod capture;
mod error;
mod generator;
mod server;
mod telemetry;
mod validation;

pub use capture::CaptureConfig;
pub use error::ConfigError;
pub use generator::GeneratorConfig;
pub use server::ServerConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/flodvakt.yaml";
const ENV_PREFIX: &str = "FLODVAKT_";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct FlodvaktConfig {
    /// Streaming endpoint listener.
    #[validate(nested)]
    #[serde(default)]
    pub server: ServerConfig,

    /// Emission cadence and registry data.
    #[validate(nested)]
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Offline capture builder output.
    #[validate(nested)]
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Logging parameters.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl FlodvaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/flodvakt.yaml` - Base settings. If missing, defaults are used.
    /// 3. `config/<FLODVAKT_ENV>.yaml` - Environment‑specific overrides.
    /// 4. `FLODVAKT_*` environment variables, `__` separating nested keys.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(FlodvaktConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("FLODVAKT_ENV").unwrap_or_else(|_| "development".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific path, still honoring `FLODVAKT_*` overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::finish(
            Figment::from(Serialized::defaults(FlodvaktConfig::default())).merge(Yaml::file(path)),
        )
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
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
