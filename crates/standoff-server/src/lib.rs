//! # Standoff server
//!
//! WebSocket assembly of the duel: accepts connections, decodes client
//! events, routes them to room actors, and pumps state broadcasts back
//! out. The layering is
//!
//! ```text
//! ws (sockets) → protocol (events) → session (seat bindings)
//!                                  → room (actors) → engine (rules)
//! ```
//!
//! One task per connection, one task per room, one outbound pump per
//! socket; the only shared state is the room registry and the binding
//! table, each behind a mutex that is never held across an await.

mod error;
mod handler;
mod server;
mod ws;

pub use error::StandoffError;
pub use server::{StandoffServer, StandoffServerBuilder};
pub use ws::{WsError, WsListener};
