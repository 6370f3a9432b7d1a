//! Per-connection handler: event routing and disconnect cleanup.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Split the socket; spawn the outbound pump on an event channel.
//!   2. Loop: receive frames, decode [`ClientEvent`]s, dispatch.
//!   3. On close or error: unbind the seat and forfeit the duel.
//!
//! Routing policy: events a client should never produce — acting in a
//! room it is not seated in, creating a second room — are dropped with a
//! debug log rather than answered. Only the two lobby failures the UI
//! shows ("Room not found", "Room full") go back as `errorMessage`.

use std::sync::Arc;

use standoff_engine::{DuelConfig, GameMode, PlayerId, ThreadDice};
use standoff_protocol::{ClientEvent, Codec, ConnectionId, RoomCode, ServerEvent};
use standoff_room::{EventSender, RoomError, RoomHandle, RoomRegistry};
use standoff_session::BindingTable;
use tokio::sync::{mpsc, Mutex};

use crate::ws::{self, WsStream};

/// Shared server state, one per process. Cloned into each connection
/// task behind an `Arc`; the two maps sit behind their own mutexes and
/// are never held across an await.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) bindings: Mutex<BindingTable>,
    pub(crate) codec: C,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec + Clone>(
    conn: ConnectionId,
    stream: WsStream,
    state: Arc<ServerState<C>>,
) {
    use futures_util::StreamExt;

    let (sink, mut source) = stream.split();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    ws::spawn_outbound_pump(state.codec.clone(), event_rx, sink);

    loop {
        let data = match ws::recv_frame(&mut source).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%conn, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn, error = %e, "undecodable frame dropped");
                continue;
            }
        };

        handle_event(conn, &state, &event_tx, event).await;
    }

    disconnect(conn, &state).await;
}

async fn handle_event<C: Codec>(
    conn: ConnectionId,
    state: &Arc<ServerState<C>>,
    event_tx: &EventSender,
    event: ClientEvent,
) {
    match event {
        ClientEvent::CreateRoom {
            player_name,
            mode,
            custom_config,
        } => {
            if state.bindings.lock().await.get(conn).is_some() {
                tracing::debug!(%conn, "createRoom from a seated connection dropped");
                return;
            }
            let config = DuelConfig::resolve(&GameMode::from_wire(mode.as_deref(), custom_config));

            let (code, snapshot) = {
                let mut rooms = state.rooms.lock().await;
                rooms.create(&player_name, config, event_tx.clone(), ThreadDice)
            };
            if let Err(e) = state
                .bindings
                .lock()
                .await
                .bind(conn, code.clone(), PlayerId::ONE)
            {
                tracing::warn!(%conn, error = %e, "bind after create failed");
                return;
            }
            let _ = event_tx.send(ServerEvent::RoomCreated {
                room_id: code,
                player_id: PlayerId::ONE,
                state: Box::new(snapshot),
            });
        }

        ClientEvent::JoinRoom {
            room_id,
            player_name,
        } => {
            if state.bindings.lock().await.get(conn).is_some() {
                tracing::debug!(%conn, "joinRoom from a seated connection dropped");
                return;
            }
            let Some(handle) = room_handle(state, &room_id).await else {
                let _ = event_tx.send(ServerEvent::error("Room not found"));
                return;
            };

            match handle.join(player_name, event_tx.clone()).await {
                Ok((seat, snapshot)) => {
                    if let Err(e) =
                        state.bindings.lock().await.bind(conn, room_id.clone(), seat)
                    {
                        tracing::warn!(%conn, error = %e, "bind after join failed");
                        return;
                    }
                    let _ = event_tx.send(ServerEvent::RoomJoined {
                        room_id,
                        player_id: seat,
                        state: Box::new(snapshot),
                    });
                }
                Err(e @ RoomError::RoomFull(_)) => {
                    let _ = event_tx.send(ServerEvent::error(e.to_string()));
                }
                // The actor is gone; to the client that room does not exist.
                Err(_) => {
                    let _ = event_tx.send(ServerEvent::error("Room not found"));
                }
            }
        }

        ClientEvent::ChooseAction { room_id, action } => {
            let Some((handle, player)) = seated_handle(conn, state, &room_id).await else {
                return;
            };
            if let Err(e) = handle.choose_action(player, action).await {
                tracing::debug!(%conn, error = %e, "chooseAction not delivered");
            }
        }

        ClientEvent::NextRound { room_id } => {
            let Some((handle, player)) = seated_handle(conn, state, &room_id).await else {
                return;
            };
            if let Err(e) = handle.next_round(player).await {
                tracing::debug!(%conn, error = %e, "nextRound not delivered");
            }
        }
    }
}

async fn room_handle<C: Codec>(
    state: &Arc<ServerState<C>>,
    code: &RoomCode,
) -> Option<RoomHandle> {
    state.rooms.lock().await.get(code)
}

/// The room handle and seat for an in-room event, or `None` when the
/// connection is unseated or names a room it does not sit in.
async fn seated_handle<C: Codec>(
    conn: ConnectionId,
    state: &Arc<ServerState<C>>,
    room_id: &RoomCode,
) -> Option<(RoomHandle, PlayerId)> {
    let player = {
        let bindings = state.bindings.lock().await;
        let binding = bindings.get(conn)?;
        if binding.room != *room_id {
            tracing::debug!(%conn, claimed = %room_id, "event for a foreign room dropped");
            return None;
        }
        binding.player
    };
    let handle = room_handle(state, room_id).await?;
    Some((handle, player))
}

/// Releases the connection's seat and forfeits its duel, dropping the
/// room from the registry once the last seat is gone.
async fn disconnect<C: Codec>(conn: ConnectionId, state: &Arc<ServerState<C>>) {
    let binding = {
        let mut bindings = state.bindings.lock().await;
        match bindings.unbind(conn) {
            Ok(binding) => binding,
            // Never seated; nothing to clean up.
            Err(_) => return,
        }
    };

    let Some(handle) = room_handle(state, &binding.room).await else {
        return;
    };
    match handle.leave(binding.player).await {
        Ok(true) => state.rooms.lock().await.remove(&binding.room),
        Ok(false) => {}
        Err(e) => tracing::debug!(%conn, error = %e, "leave after disconnect failed"),
    }
}
