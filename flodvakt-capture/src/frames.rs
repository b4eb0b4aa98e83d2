//! Ethernet II / IPv4 frame construction.

use std::net::Ipv4Addr;

use etherparse::PacketBuilder;

use crate::error::CaptureError;

const TTL: u8 = 64;
const TCP_WINDOW: u16 = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcpFlag {
    Syn,
    Ack,
}

/// Locally administered MAC derived from the IPv4 address, so every host
/// keeps a stable link-layer identity across the file.
pub fn mac_for(ip: Ipv4Addr) -> [u8; 6] {
    let [a, b, c, d] = ip.octets();
    [0x02, 0x00, a, b, c, d]
}

pub fn tcp_frame(
    src: Ipv4Addr,
    dst: Ipv4Addr,
    src_port: u16,
    dst_port: u16,
    flag: TcpFlag,
) -> Result<Vec<u8>, CaptureError> {
    let builder = PacketBuilder::ethernet2(mac_for(src), mac_for(dst))
        .ipv4(src.octets(), dst.octets(), TTL)
        .tcp(src_port, dst_port, 0, TCP_WINDOW);
    let builder = match flag {
        TcpFlag::Syn => builder.syn(),
        TcpFlag::Ack => builder.ack(0),
    };

    let mut frame = Vec::with_capacity(builder.size(0));
    builder
        .write(&mut frame, &[])
        .map_err(|e| CaptureError::Frame(e.to_string()))?;
    Ok(frame)
}

pub fn udp_frame(
    src: Ipv4Addr,
    dst: Ipv4Addr,
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Result<Vec<u8>, CaptureError> {
    let builder = PacketBuilder::ethernet2(mac_for(src), mac_for(dst))
        .ipv4(src.octets(), dst.octets(), TTL)
        .udp(src_port, dst_port);

    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder
        .write(&mut frame, payload)
        .map_err(|e| CaptureError::Frame(e.to_string()))?;
    Ok(frame)
}
