//! Error types for the session layer.

use standoff_protocol::ConnectionId;

/// Errors from the binding table.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection already holds a seat somewhere.
    #[error("connection {0} is already bound to a room")]
    AlreadyBound(ConnectionId),

    /// The connection holds no seat.
    #[error("connection {0} is not bound to any room")]
    NotBound(ConnectionId),
}
