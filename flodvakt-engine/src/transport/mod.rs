//! Transport abstraction between sessions and viewer connections.
//!
//! The two halves of a connection are separate traits so the generation loop
//! can own the outbound half while the session's receive loop owns the
//! inbound half. A closed peer, a malformed frame and a transport fault are
//! distinct outcomes rather than one catch-all error.

use async_trait::async_trait;
use flodvakt_core::PacketEvent;
use thiserror::Error;

pub mod memory;
pub mod websocket;

/// One inbound frame, as seen by the command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    /// A frame that cannot carry a command at all (e.g. non UTF-8 binary).
    Undecodable,
    /// The peer closed the connection.
    Closed,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Peer disconnected")]
    Disconnected,

    #[error("Event encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] axum::Error),
}

/// Outbound half: accepts packet events for the viewer.
#[async_trait]
pub trait EventSink: Send {
    /// Pushes one event. Any error means the connection cannot take more.
    async fn push(&mut self, event: &PacketEvent) -> Result<(), TransportError>;
}

/// Inbound half: yields the viewer's control messages.
#[async_trait]
pub trait CommandSource: Send {
    /// Waits for the next frame. `Err` is an unrecoverable receive fault.
    async fn next_message(&mut self) -> Result<Inbound, TransportError>;
}
