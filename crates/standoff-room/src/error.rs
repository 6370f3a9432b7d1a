//! Error types for the room layer.

use standoff_protocol::RoomCode;

/// Errors from the room registry and room actors.
///
/// Only [`RoomError::NotFound`] and [`RoomError::RoomFull`] are ever
/// shown to clients; everything else is logged and dropped.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room with this code.
    #[error("Room not found")]
    NotFound(RoomCode),

    /// Both seats are taken or the duel already started.
    #[error("Room full")]
    RoomFull(RoomCode),

    /// The room actor is gone; its channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
