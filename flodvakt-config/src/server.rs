//! Streaming endpoint configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate, ValidationError};

use crate::validation;

/// HTTP/WebSocket listener parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = validate_distinct_routes))]
pub struct ServerConfig {
    /// Socket address the listener binds to.
    #[validate(custom(function = validation::validate_bind_addr))]
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Route upgraded to the live event stream.
    #[validate(custom(function = validation::validate_route))]
    #[serde(default = "default_ws_path")]
    pub ws_path: String,

    /// Route serving Prometheus metrics.
    #[validate(custom(function = validation::validate_route))]
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".into()
}

fn default_ws_path() -> String {
    "/ws".into()
}

fn default_metrics_path() -> String {
    "/metrics".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            ws_path: default_ws_path(),
            metrics_path: default_metrics_path(),
        }
    }
}

/// The stream and metrics endpoints cannot share a route.
fn validate_distinct_routes(config: &ServerConfig) -> Result<(), ValidationError> {
    if config.ws_path == config.metrics_path {
        let mut error = ValidationError::new("overlapping_routes");
        error.message = Some(
            format!("ws_path and metrics_path are both {:?}", config.ws_path).into(),
        );
        return Err(error);
    }
    Ok(())
}
