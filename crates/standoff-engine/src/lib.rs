//! Duel rules for Standoff: a server-authoritative, two-player,
//! simultaneous-action shootout.
//!
//! This crate is the pure game core — no networking, no timers, no async.
//! The room layer owns a [`GameState`], feeds it committed actions, and
//! calls [`resolve_turn`] when both are in (or the countdown expired).
//! All randomness goes through the [`Dice`] seam so every probabilistic
//! branch is deterministic under test.
//!
//! # Key types
//!
//! - [`DuelConfig`] / [`GameMode`] — immutable per-room rules, resolved
//!   once at room creation
//! - [`GameState`] / [`Player`] — the full duel state
//! - [`resolve_turn`] — the simultaneous-action resolution engine
//! - [`round`] — round-over bookkeeping, resets, and forfeits

mod config;
mod dice;
mod ids;
mod player;
mod resolve;
pub mod round;
mod state;

pub use config::{CustomOverrides, DuelConfig, GameMode};
pub use dice::{Dice, ScriptedDice, ThreadDice};
pub use ids::{Action, PlayerId};
pub use player::Player;
pub use resolve::{auto_fill_actions, resolve_turn, submit_action, TurnOutcome};
pub use state::{GameState, PendingActions, LOG_CAPACITY};
