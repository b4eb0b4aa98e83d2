//! In-process transport over tokio channels, for embedding and tests.

use async_trait::async_trait;
use flodvakt_core::PacketEvent;
use tokio::sync::mpsc;

use super::{CommandSource, EventSink, Inbound, TransportError};

pub struct ChannelSink {
    tx: mpsc::Sender<PacketEvent>,
}

pub struct ChannelSource {
    rx: mpsc::Receiver<Inbound>,
}

/// The viewer's end of an in-process connection.
pub struct MemoryViewer {
    events: mpsc::Receiver<PacketEvent>,
    commands: mpsc::Sender<Inbound>,
}

/// Creates a connected sink/source pair and the viewer that drives them.
pub fn connect(capacity: usize) -> (MemoryViewer, ChannelSink, ChannelSource) {
    let (event_tx, event_rx) = mpsc::channel(capacity);
    let (command_tx, command_rx) = mpsc::channel(capacity);
    (
        MemoryViewer {
            events: event_rx,
            commands: command_tx,
        },
        ChannelSink { tx: event_tx },
        ChannelSource { rx: command_rx },
    )
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn push(&mut self, event: &PacketEvent) -> Result<(), TransportError> {
        self.tx
            .send(event.clone())
            .await
            .map_err(|_| TransportError::Disconnected)
    }
}

#[async_trait]
impl CommandSource for ChannelSource {
    async fn next_message(&mut self) -> Result<Inbound, TransportError> {
        Ok(self.rx.recv().await.unwrap_or(Inbound::Closed))
    }
}

impl MemoryViewer {
    /// Next event pushed by the session, `None` once its generator is gone.
    pub async fn next_event(&mut self) -> Option<PacketEvent> {
        self.events.recv().await
    }

    pub async fn send_text(&self, text: impl Into<String>) -> bool {
        self.commands.send(Inbound::Text(text.into())).await.is_ok()
    }

    pub async fn send_frame(&self, frame: Inbound) -> bool {
        self.commands.send(frame).await.is_ok()
    }

    /// Sends `{"action": "SET_MODE", "value": <mode>}`.
    pub async fn set_mode(&self, mode: &str) -> bool {
        let command = serde_json::json!({ "action": "SET_MODE", "value": mode });
        self.send_text(command.to_string()).await
    }

    /// Closes the inbound direction, as a peer hanging up would. Events
    /// already queued stay readable.
    pub async fn hang_up(&self) -> bool {
        self.send_frame(Inbound::Closed).await
    }
}
