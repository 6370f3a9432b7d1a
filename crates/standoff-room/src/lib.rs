//! Room layer for Standoff: one actor task per duel.
//!
//! A room owns its [`standoff_engine::GameState`] and a [`TurnClock`],
//! and is driven by two inputs only — commands from connection handlers
//! and its own alarm. The [`RoomRegistry`] maps room codes to running
//! actors.
//!
//! # Turn cycle
//!
//! ```text
//! start_turn ──→ both actions in ──→ resolve ──→ Resolved-Pause ──→ start_turn
//!      │                               ▲   └──→ round over (await nextRound)
//!      └──── deadline: auto-fill ──────┘
//! ```

mod clock;
mod error;
mod registry;
mod room;

pub use clock::{Alarm, TurnClock};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{EventSender, RoomHandle, RESOLVED_PAUSE};

pub(crate) use room::spawn_room;
