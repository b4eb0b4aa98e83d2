use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Frame construction failed: {0}")]
    Frame(String),

    #[error("pcap encoding failed: {0}")]
    Pcap(#[from] pcap_file::PcapError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
