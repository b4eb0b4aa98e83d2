use flodvakt_config::ConfigError;
use flodvakt_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scenario registry error: {0}")]
    Registry(#[from] CoreError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Invalid bind address: {0:?}")]
    BindAddr(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
