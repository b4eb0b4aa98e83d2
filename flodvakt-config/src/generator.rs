//! Event generation cadence and registry data.

use std::time::Duration;

use flodvakt_core::RegistrySettings;
use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct GeneratorConfig {
    /// Emission interval while `DDOS` is active (milliseconds).
    #[validate(range(min = 1, max = 60_000))]
    #[serde(default = "default_fast_interval")]
    pub fast_interval_ms: u64,

    /// Emission interval for every other scenario (milliseconds).
    #[validate(range(min = 1, max = 60_000))]
    #[serde(default = "default_slow_interval")]
    pub slow_interval_ms: u64,

    /// Chance that a `NORMAL` event is labelled TCP.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_tcp_probability")]
    pub normal_tcp_probability: f64,
}

fn default_fast_interval() -> u64 {
    100
}

fn default_slow_interval() -> u64 {
    500
}

fn default_tcp_probability() -> f64 {
    0.7
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fast_interval_ms: default_fast_interval(),
            slow_interval_ms: default_slow_interval(),
            normal_tcp_probability: default_tcp_probability(),
        }
    }
}

impl GeneratorConfig {
    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            fast_interval: Duration::from_millis(self.fast_interval_ms),
            slow_interval: Duration::from_millis(self.slow_interval_ms),
            normal_tcp_probability: self.normal_tcp_probability,
        }
    }
}
