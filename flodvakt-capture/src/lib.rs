//! flodvakt‑capture
//!
//! Offline capture builder. Produces a fixed, ordered batch of synthetic
//! frames (background browsing, a port scan, a UDP flood) and writes it to a
//! pcap file for replay demos. It shares the scenario vocabulary of the live
//! stream but none of its code or runtime state.

pub mod builder;
pub mod error;
pub mod frames;

pub use builder::{
    build_capture_file, CaptureBuilder, CaptureRecord, CaptureSummary, TrafficPhase,
};
pub use error::CaptureError;
