//! WebSocket plumbing using `tokio-tungstenite`.
//!
//! Each accepted socket is split: the read half stays with the
//! connection handler, the write half moves into an outbound pump task
//! fed by the same unbounded channel the rooms broadcast on. Everything
//! a connection is sent, from any task, goes through that one channel.

use std::net::SocketAddr;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use standoff_protocol::{Codec, ConnectionId, ServerEvent};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

pub type WsStream = WebSocketStream<TcpStream>;
pub type WsSink = SplitSink<WsStream, Message>;
pub type WsSource = SplitStream<WsStream>;

/// Socket-level errors.
#[derive(Debug, thiserror::Error)]
pub enum WsError {
    #[error("bind or accept failed: {0}")]
    Accept(#[from] std::io::Error),

    #[error("WebSocket handshake failed: {0}")]
    Handshake(tokio_tungstenite::tungstenite::Error),

    #[error("receive failed: {0}")]
    Receive(tokio_tungstenite::tungstenite::Error),
}

/// Listens for incoming WebSocket connections.
pub struct WsListener {
    listener: TcpListener,
}

impl WsListener {
    pub async fn bind(addr: &str) -> Result<Self, WsError> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr, "WebSocket listener bound");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts one connection and completes the WebSocket handshake.
    pub async fn accept(&self) -> Result<(ConnectionId, WsStream), WsError> {
        let (stream, addr) = self.listener.accept().await?;
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(WsError::Handshake)?;

        let id = ConnectionId::next();
        tracing::debug!(%id, %addr, "accepted WebSocket connection");
        Ok((id, ws))
    }
}

/// Receives the next data frame, skipping ping/pong.
///
/// Returns `None` on a clean close. Text and binary frames are both
/// accepted, so browser and native clients can speak whichever they
/// prefer.
pub async fn recv_frame(source: &mut WsSource) -> Result<Option<Vec<u8>>, WsError> {
    loop {
        match source.next().await {
            Some(Ok(Message::Binary(data))) => return Ok(Some(data.into())),
            Some(Ok(Message::Text(text))) => return Ok(Some(text.as_bytes().to_vec())),
            Some(Ok(Message::Close(_))) | None => return Ok(None),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(WsError::Receive(e)),
        }
    }
}

/// Spawns the outbound pump: encodes every [`ServerEvent`] from the
/// channel and writes it to the socket.
///
/// The pump exits when the channel closes (connection handler gone and
/// the room dropped its sender) or when a write fails; either way it
/// closes the sink.
pub fn spawn_outbound_pump<C: Codec + Clone>(
    codec: C,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    mut sink: WsSink,
) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode outbound event");
                    continue;
                }
            };
            if sink.send(Message::Binary(bytes.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });
}
