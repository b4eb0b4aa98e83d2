//! axum WebSocket halves as session transports.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use flodvakt_core::PacketEvent;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::trace;

use super::{CommandSource, EventSink, Inbound, TransportError};

#[async_trait]
impl EventSink for SplitSink<WebSocket, Message> {
    async fn push(&mut self, event: &PacketEvent) -> Result<(), TransportError> {
        let text = serde_json::to_string(event)?;
        self.send(Message::Text(text.into())).await?;
        Ok(())
    }
}

#[async_trait]
impl CommandSource for SplitStream<WebSocket> {
    async fn next_message(&mut self) -> Result<Inbound, TransportError> {
        loop {
            match self.next().await {
                None | Some(Ok(Message::Close(_))) => return Ok(Inbound::Closed),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Text(text))) => {
                    return Ok(Inbound::Text(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    return Ok(match std::str::from_utf8(&bytes) {
                        Ok(text) => Inbound::Text(text.to_owned()),
                        Err(_) => Inbound::Undecodable,
                    })
                }
                // axum answers pings itself.
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    trace!("Skipping control frame");
                }
            }
        }
    }
}
