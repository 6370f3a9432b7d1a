//! The binding table: which connection sits in which seat.
//!
//! Every accepted WebSocket gets a [`ConnectionId`]; once the client
//! creates or joins a room the connection is bound to a `(room, seat)`
//! pair. The table is consulted on every inbound event (to route it) and
//! on disconnect (to know which duel to forfeit).
//!
//! # Concurrency note
//!
//! `BindingTable` is a plain `HashMap` and not thread-safe by itself; it
//! is owned by the server state and accessed through a mutex at a higher
//! level. Keeping it simple here avoids hidden locking overhead.

use std::collections::HashMap;

use standoff_engine::PlayerId;
use standoff_protocol::{ConnectionId, RoomCode};

use crate::SessionError;

/// The seat one connection occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room: RoomCode,
    pub player: PlayerId,
}

/// All live connection → seat bindings.
#[derive(Debug, Default)]
pub struct BindingTable {
    bindings: HashMap<ConnectionId, Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats a connection in a room.
    ///
    /// # Errors
    /// [`SessionError::AlreadyBound`] if the connection already holds a
    /// seat — one duel per connection.
    pub fn bind(
        &mut self,
        conn: ConnectionId,
        room: RoomCode,
        player: PlayerId,
    ) -> Result<(), SessionError> {
        if self.bindings.contains_key(&conn) {
            return Err(SessionError::AlreadyBound(conn));
        }
        tracing::debug!(%conn, %room, %player, "connection bound");
        self.bindings.insert(conn, Binding { room, player });
        Ok(())
    }

    /// The seat this connection holds, if any.
    pub fn get(&self, conn: ConnectionId) -> Option<&Binding> {
        self.bindings.get(&conn)
    }

    /// Releases a connection's seat, returning it for the forfeit path.
    ///
    /// # Errors
    /// [`SessionError::NotBound`] if the connection held no seat — e.g.
    /// a socket that dropped before ever creating or joining a room.
    pub fn unbind(&mut self, conn: ConnectionId) -> Result<Binding, SessionError> {
        let binding = self
            .bindings
            .remove(&conn)
            .ok_or(SessionError::NotBound(conn))?;
        tracing::debug!(%conn, room = %binding.room, "connection unbound");
        Ok(binding)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> RoomCode {
        RoomCode::from(s)
    }

    #[test]
    fn test_bind_and_lookup() {
        let mut table = BindingTable::new();
        let conn = ConnectionId::next();
        table.bind(conn, code("AB12CD"), PlayerId::ONE).unwrap();

        let binding = table.get(conn).unwrap();
        assert_eq!(binding.room, code("AB12CD"));
        assert_eq!(binding.player, PlayerId::ONE);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_one_seat_per_connection() {
        let mut table = BindingTable::new();
        let conn = ConnectionId::next();
        table.bind(conn, code("AB12CD"), PlayerId::ONE).unwrap();

        let result = table.bind(conn, code("ZZ99ZZ"), PlayerId::TWO);
        assert!(matches!(result, Err(SessionError::AlreadyBound(_))));
    }

    #[test]
    fn test_unbind_returns_the_seat() {
        let mut table = BindingTable::new();
        let conn = ConnectionId::next();
        table.bind(conn, code("AB12CD"), PlayerId::TWO).unwrap();

        let binding = table.unbind(conn).unwrap();
        assert_eq!(binding.player, PlayerId::TWO);
        assert!(table.is_empty());
        assert!(table.get(conn).is_none());
    }

    #[test]
    fn test_unbind_unknown_connection_errors() {
        let mut table = BindingTable::new();
        let result = table.unbind(ConnectionId::next());
        assert!(matches!(result, Err(SessionError::NotBound(_))));
    }

    #[test]
    fn test_rebind_after_unbind() {
        let mut table = BindingTable::new();
        let conn = ConnectionId::next();
        table.bind(conn, code("AB12CD"), PlayerId::ONE).unwrap();
        table.unbind(conn).unwrap();
        table.bind(conn, code("EF34GH"), PlayerId::TWO).unwrap();
        assert_eq!(table.get(conn).unwrap().room, code("EF34GH"));
    }
}
