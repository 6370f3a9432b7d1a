//! Duel configuration: game modes and the resolved, immutable rule set.
//!
//! A room is created with a [`GameMode`]; [`DuelConfig::resolve`] turns
//! it into a fully-populated config exactly once. Custom overrides are
//! clamped to safe ranges at that point and the result is never mutated
//! afterwards — no fallback chains at use sites.

use serde::{Deserialize, Serialize};

/// The fixed mode set a room can be created with.
///
/// Unknown mode names on the wire fall back to `Tactico`, the default
/// mode.
#[derive(Debug, Clone, PartialEq)]
pub enum GameMode {
    /// Deterministic duel: no special events, 3 hp, 3 max ammo.
    Normal,
    /// The full probabilistic rule set.
    Tactico,
    /// `Tactico` baseline with a handful of clamped overrides.
    Custom(CustomOverrides),
}

impl GameMode {
    /// Maps a wire mode name (plus optional overrides) to a mode.
    ///
    /// Only `custom` consumes the overrides; unrecognized names resolve
    /// to [`GameMode::Tactico`].
    pub fn from_wire(name: Option<&str>, overrides: Option<CustomOverrides>) -> GameMode {
        match name {
            Some("normal") => GameMode::Normal,
            Some("custom") => GameMode::Custom(overrides.unwrap_or_default()),
            _ => GameMode::Tactico,
        }
    }
}

/// The override keys `custom` mode accepts.
///
/// Every field is optional; anything else in the client payload is
/// ignored rather than rejected. Values are clamped server-side by
/// [`DuelConfig::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomOverrides {
    pub hp_per_player: Option<u32>,
    pub max_ammo: Option<u32>,
    pub precise_shot_chance: Option<f64>,
    pub max_turtle_turns_without_attack: Option<u32>,
    pub afk_limit: Option<u32>,
}

/// Immutable per-room rules.
///
/// Built once by [`DuelConfig::resolve`]; every other component treats
/// it as read-only. All chances are probabilities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelConfig {
    pub starting_ammo: u32,
    pub max_ammo: u32,
    pub max_consecutive_blocks: u32,
    pub afk_limit: u32,
    pub hp_per_player: u32,
    pub turn_duration_ms: u64,
    /// Turns without attacking before the turtle penalty is rolled.
    /// 0 disables the penalty.
    pub max_turtle_turns_without_attack: u32,
    pub turtle_drop_chance: f64,

    // Special-event chances. `precise_shot_chance == 0` disables every
    // probabilistic branch wholesale (how `normal` mode reuses the
    // engine without randomness).
    pub precise_shot_chance: f64,
    pub perfect_block_chance: f64,
    pub weapon_jam_chance: f64,
    pub double_reload_chance: f64,
    pub reload_drop_chance: f64,
    pub last_stand_chance: f64,
    pub miracle_dodge_chance: f64,
    pub ghost_bullet_chance: f64,
    pub nervous_miss_chance: f64,
    pub shield_weaken_chance: f64,

    // Intimidation: negative events against the player trailing by at
    // least one of these margins are scaled by the multiplier.
    pub intimidation_hp_diff: u32,
    pub intimidation_ammo_diff: u32,
    pub intimidation_multiplier: f64,
}

impl DuelConfig {
    /// Baseline for `normal` mode: no specials, pure action play.
    pub fn normal() -> Self {
        Self {
            starting_ammo: 0,
            max_ammo: 3,
            max_consecutive_blocks: 3,
            afk_limit: 4,
            hp_per_player: 3,
            turn_duration_ms: 15_000,
            max_turtle_turns_without_attack: 0,
            turtle_drop_chance: 0.0,
            precise_shot_chance: 0.0,
            perfect_block_chance: 0.0,
            weapon_jam_chance: 0.0,
            double_reload_chance: 0.0,
            reload_drop_chance: 0.0,
            last_stand_chance: 0.0,
            miracle_dodge_chance: 0.0,
            ghost_bullet_chance: 0.0,
            nervous_miss_chance: 0.0,
            shield_weaken_chance: 0.0,
            intimidation_hp_diff: 2,
            intimidation_ammo_diff: 2,
            intimidation_multiplier: 1.0,
        }
    }

    /// Baseline for `tactico` mode and the starting point for `custom`.
    pub fn tactico() -> Self {
        Self {
            starting_ammo: 1,
            max_ammo: 5,
            max_consecutive_blocks: 3,
            afk_limit: 4,
            hp_per_player: 5,
            turn_duration_ms: 15_000,
            max_turtle_turns_without_attack: 3,
            turtle_drop_chance: 0.35,
            precise_shot_chance: 0.12,
            perfect_block_chance: 0.12,
            weapon_jam_chance: 0.08,
            double_reload_chance: 0.10,
            reload_drop_chance: 0.08,
            last_stand_chance: 0.15,
            miracle_dodge_chance: 0.06,
            ghost_bullet_chance: 0.08,
            nervous_miss_chance: 0.10,
            shield_weaken_chance: 0.20,
            intimidation_hp_diff: 2,
            intimidation_ammo_diff: 2,
            intimidation_multiplier: 1.5,
        }
    }

    /// Resolves a mode into the room's fixed config.
    ///
    /// Custom overrides are applied over the `tactico` baseline, each
    /// clamped to its documented range: hp ∈ [1,10], max ammo ∈ [1,12],
    /// precise-shot ∈ [0,0.5], turtle turns ∈ [0,10] (0 = off),
    /// afk limit ∈ [1,10]. Out-of-range values clamp; they never fail
    /// room creation.
    pub fn resolve(mode: &GameMode) -> Self {
        let mut config = match mode {
            GameMode::Normal => Self::normal(),
            GameMode::Tactico => Self::tactico(),
            GameMode::Custom(overrides) => {
                let mut c = Self::tactico();
                if let Some(hp) = overrides.hp_per_player {
                    c.hp_per_player = hp.clamp(1, 10);
                }
                if let Some(ammo) = overrides.max_ammo {
                    c.max_ammo = ammo.clamp(1, 12);
                }
                if let Some(chance) = overrides.precise_shot_chance {
                    c.precise_shot_chance = chance.clamp(0.0, 0.5);
                }
                if let Some(turns) = overrides.max_turtle_turns_without_attack {
                    c.max_turtle_turns_without_attack = turns.min(10);
                }
                if let Some(limit) = overrides.afk_limit {
                    c.afk_limit = limit.clamp(1, 10);
                }
                c
            }
        };
        config.starting_ammo = config.starting_ammo.min(config.max_ammo);
        config.clamp_chances();
        config
    }

    /// Whether probabilistic branches run at all for this room.
    pub fn specials_enabled(&self) -> bool {
        self.precise_shot_chance > 0.0
    }

    fn clamp_chances(&mut self) {
        for chance in [
            &mut self.turtle_drop_chance,
            &mut self.precise_shot_chance,
            &mut self.perfect_block_chance,
            &mut self.weapon_jam_chance,
            &mut self.double_reload_chance,
            &mut self.reload_drop_chance,
            &mut self.last_stand_chance,
            &mut self.miracle_dodge_chance,
            &mut self.ghost_bullet_chance,
            &mut self.nervous_miss_chance,
            &mut self.shield_weaken_chance,
        ] {
            *chance = chance.clamp(0.0, 1.0);
        }
    }
}
