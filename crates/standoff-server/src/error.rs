//! Unified error type for the server crate.

use standoff_protocol::ProtocolError;
use standoff_room::RoomError;
use standoff_session::SessionError;

use crate::ws::WsError;

/// Top-level error that wraps all layer-specific errors.
///
/// The binary and the server loop deal with this single type; the
/// `#[from]` attribute on each variant lets `?` convert layer errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum StandoffError {
    /// A socket-level error (bind, accept, send, recv).
    #[error(transparent)]
    Ws(#[from] WsError),

    /// A wire-level error (encode, decode, invalid event).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A binding-level error (seat already held, unknown connection).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (not found, full, actor gone).
    #[error(transparent)]
    Room(#[from] RoomError),
}
