//! `StandoffServer` builder and accept loop.
//!
//! This is the entry point for running a duel server. It ties together
//! all the layers: socket → protocol → bindings → rooms → engine.

use std::sync::Arc;

use standoff_protocol::JsonCodec;
use standoff_room::RoomRegistry;
use standoff_session::BindingTable;
use tokio::sync::Mutex;

use crate::handler::{handle_connection, ServerState};
use crate::ws::WsListener;
use crate::StandoffError;

/// Builder for configuring and starting a duel server.
///
/// # Example
///
/// ```rust,ignore
/// let server = StandoffServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct StandoffServerBuilder {
    bind_addr: String,
}

impl StandoffServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and assembles the server state.
    pub async fn build(self) -> Result<StandoffServer, StandoffError> {
        let listener = WsListener::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::new()),
            bindings: Mutex::new(BindingTable::new()),
            codec: JsonCodec,
        });

        Ok(StandoffServer { listener, state })
    }
}

impl Default for StandoffServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running duel server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct StandoffServer {
    listener: WsListener,
    state: Arc<ServerState<JsonCodec>>,
}

impl StandoffServer {
    pub fn builder() -> StandoffServerBuilder {
        StandoffServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(self) -> Result<(), StandoffError> {
        tracing::info!("standoff server running");

        loop {
            match self.listener.accept().await {
                Ok((conn, stream)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        handle_connection(conn, stream, state).await;
                        tracing::debug!(%conn, "connection handler finished");
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
