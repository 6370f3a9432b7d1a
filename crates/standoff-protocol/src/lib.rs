//! Wire protocol for Standoff.
//!
//! Defines the language clients and server speak:
//!
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — internally tagged
//!   JSON, camelCase fields, full [`standoff_engine::GameState`]
//!   snapshots in every state-bearing event.
//! - **Identifiers** ([`RoomCode`], [`ConnectionId`]).
//! - **Codec** ([`Codec`], [`JsonCodec`]) — how events become bytes.
//!
//! The protocol layer knows nothing about sockets or rooms; it sits
//! between the transport (frames) and the session layer (who sent this).

mod codec;
mod error;
mod events;
mod ids;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent};
pub use ids::{ConnectionId, RoomCode};
