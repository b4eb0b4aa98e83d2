//! The fixed three-phase demo batch and its pcap serialization.
//!
//! Order inside the file is always: background browsing, then the port scan,
//! then the flood. The whole file is encoded in memory and written with one
//! `fs::write`, so a reader never sees a partial batch from this builder.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pcap_file::pcap::{PcapPacket, PcapWriter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::CaptureError;
use crate::frames::{tcp_frame, udp_frame, TcpFlag};

pub const BACKGROUND_COUNT: usize = 50;
pub const SCAN_PORTS: Range<u16> = 20..100;
pub const DDOS_COUNT: usize = 100;
pub const DDOS_PADDING: usize = 100;

const HOST: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 5);
const WEB_SERVER: Ipv4Addr = Ipv4Addr::new(142, 250, 1, 1);
const ATTACKER: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 66);
const HTTPS_PORT: u16 = 443;
const FLOOD_PORT: u16 = 80;
const SCAN_SOURCE_PORT: u16 = 20;
const FLOOD_SOURCE_PORT: u16 = 53;
const FRAME_SPACING: Duration = Duration::from_millis(1);

/// Which block of the batch a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficPhase {
    Background,
    PortScan,
    DdosBurst,
}

#[derive(Debug, Clone)]
pub struct CaptureRecord {
    pub phase: TrafficPhase,
    pub frame: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSummary {
    pub path: PathBuf,
    pub records: usize,
    pub bytes: usize,
}

pub struct CaptureBuilder {
    rng: StdRng,
    start: Duration,
}

impl CaptureBuilder {
    /// Timestamps start at the current wall-clock time.
    pub fn new(seed: u64) -> Self {
        let start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::with_start(seed, start)
    }

    /// Fully reproducible builder: same seed and start, same bytes.
    pub fn with_start(seed: u64, start: Duration) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            start,
        }
    }

    /// Builds the ordered batch.
    pub fn build(&mut self) -> Result<Vec<CaptureRecord>, CaptureError> {
        let mut records = Vec::with_capacity(BACKGROUND_COUNT + SCAN_PORTS.len() + DDOS_COUNT);

        info!("Generating normal traffic");
        for _ in 0..BACKGROUND_COUNT {
            let src_port = self.rng.random_range(1024..=u16::MAX);
            records.push(CaptureRecord {
                phase: TrafficPhase::Background,
                frame: tcp_frame(HOST, WEB_SERVER, src_port, HTTPS_PORT, TcpFlag::Ack)?,
            });
        }

        info!("Generating port scan from {ATTACKER}");
        for port in SCAN_PORTS {
            records.push(CaptureRecord {
                phase: TrafficPhase::PortScan,
                frame: tcp_frame(ATTACKER, HOST, SCAN_SOURCE_PORT, port, TcpFlag::Syn)?,
            });
        }

        info!("Generating DDoS burst against {HOST}");
        let padding = [b'X'; DDOS_PADDING];
        for source in self.flood_sources() {
            records.push(CaptureRecord {
                phase: TrafficPhase::DdosBurst,
                frame: udp_frame(source, HOST, FLOOD_SOURCE_PORT, FLOOD_PORT, &padding)?,
            });
        }

        Ok(records)
    }

    /// `DDOS_COUNT` distinct `1.1.x.y` addresses with x, y in [1, 255].
    fn flood_sources(&mut self) -> Vec<Ipv4Addr> {
        let mut seen = HashSet::with_capacity(DDOS_COUNT);
        let mut sources = Vec::with_capacity(DDOS_COUNT);
        while sources.len() < DDOS_COUNT {
            let addr = Ipv4Addr::new(
                1,
                1,
                self.rng.random_range(1..=255),
                self.rng.random_range(1..=255),
            );
            if seen.insert(addr) {
                sources.push(addr);
            }
        }
        sources
    }

    /// Serializes `records` as a little-endian Ethernet pcap image.
    pub fn encode(&self, records: &[CaptureRecord]) -> Result<Vec<u8>, CaptureError> {
        let mut writer = PcapWriter::new(Vec::new())?;
        for (index, record) in records.iter().enumerate() {
            let timestamp = self.start + FRAME_SPACING * index as u32;
            writer.write_packet(&PcapPacket::new(
                timestamp,
                record.frame.len() as u32,
                &record.frame,
            ))?;
        }
        Ok(writer.into_writer())
    }

    /// Builds, encodes and writes the batch to `path` in one write.
    pub fn write_to(&mut self, path: &Path) -> Result<CaptureSummary, CaptureError> {
        let records = self.build()?;
        let image = self.encode(&records)?;
        info!("Saving {} packets to {}", records.len(), path.display());
        std::fs::write(path, &image)?;
        Ok(CaptureSummary {
            path: path.to_path_buf(),
            records: records.len(),
            bytes: image.len(),
        })
    }
}

/// One-shot helper used by the CLI.
pub fn build_capture_file(path: &Path, seed: u64) -> Result<CaptureSummary, CaptureError> {
    CaptureBuilder::new(seed).write_to(path)
}
