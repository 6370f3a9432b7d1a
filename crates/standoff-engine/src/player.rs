//! Per-player combat state.

use serde::{Deserialize, Serialize};

use crate::{Action, DuelConfig, PlayerId};

/// One duelist.
///
/// Combat stats and transient flags reset every round
/// ([`Player::reset_for_round`]); `score` persists for the life of the
/// room. Streak counters feed the special-event and penalty rules in
/// the resolution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub ammo: u32,
    pub is_blocking: bool,
    /// Set by an absorbed shot; a later block may fail outright.
    pub shield_weakened: bool,
    /// Last stand saves a player once per round.
    pub last_stand_used: bool,
    pub consecutive_blocks: u32,
    pub consecutive_hits: u32,
    pub turns_without_attack: u32,
    pub afk_turns: u32,
    /// The real action chosen last turn; `None` before the first choice
    /// and for a synthetic AFK turn.
    pub last_action: Option<Action>,
    pub score: u32,
}

impl Player {
    /// A fresh player with round-1 defaults from the room config.
    pub fn new(id: PlayerId, name: impl Into<String>, config: &DuelConfig) -> Self {
        Self {
            id,
            name: name.into(),
            hp: config.hp_per_player,
            max_hp: config.hp_per_player,
            ammo: config.starting_ammo,
            is_blocking: false,
            shield_weakened: false,
            last_stand_used: false,
            consecutive_blocks: 0,
            consecutive_hits: 0,
            turns_without_attack: 0,
            afk_turns: 0,
            last_action: None,
            score: 0,
        }
    }

    /// Restores round-1 defaults, keeping identity and score.
    pub fn reset_for_round(&mut self, config: &DuelConfig) {
        self.hp = config.hp_per_player;
        self.max_hp = config.hp_per_player;
        self.ammo = config.starting_ammo;
        self.is_blocking = false;
        self.shield_weakened = false;
        self.last_stand_used = false;
        self.consecutive_blocks = 0;
        self.consecutive_hits = 0;
        self.turns_without_attack = 0;
        self.afk_turns = 0;
        self.last_action = None;
    }

    /// Out of hp.
    pub fn is_down(&self) -> bool {
        self.hp == 0
    }
}
