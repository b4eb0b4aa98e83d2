//! Offline capture file parameters.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CaptureConfig {
    /// Destination of the generated pcap file.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Seed for the random ports and flood sources.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_output() -> PathBuf {
    PathBuf::from("demo.pcap")
}

fn default_seed() -> u64 {
    42
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            seed: default_seed(),
        }
    }
}
