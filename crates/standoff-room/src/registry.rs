//! The room registry: every open room, keyed by its code.
//!
//! Owned by the server state and shared behind a mutex; the registry
//! itself is a plain map so all locking stays at one level.

use std::collections::HashMap;

use standoff_engine::{Dice, DuelConfig, GameState};
use standoff_protocol::RoomCode;

use crate::{spawn_room, EventSender, RoomHandle};

/// All open rooms.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, RoomHandle>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a room with the host in seat 1 and returns its code and the
    /// initial state snapshot for the `roomCreated` reply.
    ///
    /// Generated codes are retried until unused; with a 36^6 code space
    /// the loop all but never repeats.
    pub fn create<D: Dice + Send + 'static>(
        &mut self,
        host_name: &str,
        config: DuelConfig,
        host_sender: EventSender,
        dice: D,
    ) -> (RoomCode, GameState) {
        let code = loop {
            let candidate = RoomCode::generate();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let (handle, snapshot) = spawn_room(code.clone(), host_name, config, host_sender, dice);
        self.rooms.insert(code.clone(), handle);
        tracing::info!(room = %code, rooms = self.rooms.len(), "room registered");
        (code, snapshot)
    }

    /// A handle to the room with this code, if it exists.
    pub fn get(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).cloned()
    }

    /// Drops a room from the registry once its actor is gone.
    pub fn remove(&mut self, code: &RoomCode) {
        if self.rooms.remove(code).is_some() {
            tracing::info!(room = %code, rooms = self.rooms.len(), "room dropped");
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
