//! Session layer for Standoff: tracks which WebSocket connection sits in
//! which room seat.
//!
//! Deliberately small — the duel has no accounts and no reconnection
//! grace; a dropped socket forfeits the round. What remains is the
//! [`BindingTable`], the single source of truth for routing inbound
//! events and handling disconnects.

mod bindings;
mod error;

pub use bindings::{Binding, BindingTable};
pub use error::SessionError;
