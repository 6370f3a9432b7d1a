//! Player identity and the action alphabet.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two duel seats.
///
/// Newtype over the wire representation (`1` or `2`). The inner value is
/// private so the only inhabitants constructed in code are
/// [`PlayerId::ONE`] and [`PlayerId::TWO`]; `#[serde(transparent)]`
/// keeps it a plain number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const ONE: PlayerId = PlayerId(1);
    pub const TWO: PlayerId = PlayerId(2);

    /// The opposing seat.
    pub fn other(self) -> PlayerId {
        if self == Self::ONE { Self::TWO } else { Self::ONE }
    }

    /// Index into the `[Player; 2]` array.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The wire number (1 or 2).
    pub fn number(self) -> u8 {
        self.0
    }

    /// The seat for a given array index (0 or 1).
    pub fn from_index(index: usize) -> PlayerId {
        if index == 0 { Self::ONE } else { Self::TWO }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// One simultaneous-turn action.
///
/// `Afk` is synthetic: the engine substitutes it for a player who keeps
/// missing the selection window. Clients never choose it, and the server
/// ignores any attempt to submit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Attack,
    Reload,
    Block,
    Afk,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => write!(f, "attack"),
            Self::Reload => write!(f, "reload"),
            Self::Block => write!(f, "block"),
            Self::Afk => write!(f, "afk"),
        }
    }
}
