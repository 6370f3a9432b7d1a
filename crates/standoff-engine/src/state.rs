//! The full duel state owned by a room.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{Action, DuelConfig, Player, PlayerId};

/// Maximum entries kept in the narrated log ring.
pub const LOG_CAPACITY: usize = 50;

/// The two action slots for the current selection window.
///
/// Serialized with the player numbers as keys (`{"1": ..., "2": ...}`),
/// matching the wire shape clients expect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingActions {
    #[serde(rename = "1")]
    pub one: Option<Action>,
    #[serde(rename = "2")]
    pub two: Option<Action>,
}

impl PendingActions {
    pub fn get(&self, id: PlayerId) -> Option<Action> {
        match id {
            PlayerId::ONE => self.one,
            _ => self.two,
        }
    }

    pub fn set(&mut self, id: PlayerId, action: Action) {
        match id {
            PlayerId::ONE => self.one = Some(action),
            _ => self.two = Some(action),
        }
    }

    pub fn both_chosen(&self) -> bool {
        self.one.is_some() && self.two.is_some()
    }

    pub fn clear(&mut self) {
        self.one = None;
        self.two = None;
    }
}

/// Everything a room knows about its duel.
///
/// Broadcast verbatim to both clients on every change; there is no
/// hidden server-only state besides the armed timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub players: [Player; 2],
    pub round: u32,
    pub is_round_over: bool,
    /// Round winner; `None` with `is_round_over` means a draw.
    pub winner_id: Option<PlayerId>,
    /// Narrated outcomes, newest first, capped at [`LOG_CAPACITY`].
    pub log: VecDeque<String>,
    pub game_started: bool,
    pub pending_actions: PendingActions,
    /// Epoch ms when the current selection window closes; `None` hides
    /// the countdown (Resolved-Pause, lobby, round over).
    pub turn_ends_at: Option<u64>,
    pub config: DuelConfig,
    pub total_turns: u32,
}

impl GameState {
    /// A freshly-created room: host seated as player 1, a placeholder
    /// in seat 2, duel not started.
    pub fn new(host_name: &str, config: DuelConfig) -> Self {
        let host = if host_name.trim().is_empty() {
            "Player 1"
        } else {
            host_name
        };
        let p1 = Player::new(PlayerId::ONE, host, &config);
        let p2 = Player::new(PlayerId::TWO, "Waiting...", &config);
        let mut state = Self {
            players: [p1, p2],
            round: 1,
            is_round_over: false,
            winner_id: None,
            log: VecDeque::new(),
            game_started: false,
            pending_actions: PendingActions::default(),
            turn_ends_at: None,
            config,
            total_turns: 0,
        };
        state.push_log(format!("Room created by {}.", state.players[0].name));
        state.push_log("Waiting for the second player to connect...");
        state
    }

    /// Prepends a narrated line, dropping the oldest past capacity.
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push_front(line.into());
        if self.log.len() > LOG_CAPACITY {
            self.log.pop_back();
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// Whether a `chooseAction` is currently accepted: the duel is
    /// running, the round is live, and a selection window is open
    /// (not the post-resolution pause).
    pub fn accepting_actions(&self) -> bool {
        self.game_started && !self.is_round_over && self.turn_ends_at.is_some()
    }

    /// Opens a new selection window closing at `ends_at` (epoch ms).
    ///
    /// Clears both pending slots — exactly once per turn start.
    pub fn begin_turn(&mut self, ends_at: u64) {
        self.pending_actions.clear();
        self.turn_ends_at = Some(ends_at);
        let secs = self.config.turn_duration_ms / 1000;
        self.push_log(format!("Choose your actions. You have {secs} seconds."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_seats_host_and_placeholder() {
        let state = GameState::new("Ana", DuelConfig::normal());
        assert_eq!(state.players[0].name, "Ana");
        assert_eq!(state.players[1].name, "Waiting...");
        assert!(!state.game_started);
        assert_eq!(state.round, 1);
        assert!(state.log.iter().any(|l| l.contains("Room created by Ana")));
    }

    #[test]
    fn test_new_state_defaults_empty_host_name() {
        let state = GameState::new("   ", DuelConfig::normal());
        assert_eq!(state.players[0].name, "Player 1");
    }

    #[test]
    fn test_push_log_newest_first_and_bounded() {
        let mut state = GameState::new("Ana", DuelConfig::normal());
        for i in 0..60 {
            state.push_log(format!("line {i}"));
        }
        assert_eq!(state.log.len(), LOG_CAPACITY);
        assert_eq!(state.log[0], "line 59");
    }

    #[test]
    fn test_begin_turn_clears_pending_and_sets_deadline() {
        let mut state = GameState::new("Ana", DuelConfig::normal());
        state.game_started = true;
        state.pending_actions.set(PlayerId::ONE, Action::Attack);
        state.begin_turn(123_456);
        assert_eq!(state.pending_actions, PendingActions::default());
        assert_eq!(state.turn_ends_at, Some(123_456));
        assert!(state.accepting_actions());
    }

    #[test]
    fn test_accepting_actions_requires_open_window() {
        let mut state = GameState::new("Ana", DuelConfig::normal());
        assert!(!state.accepting_actions(), "not started");
        state.game_started = true;
        assert!(!state.accepting_actions(), "no window open");
        state.begin_turn(1);
        assert!(state.accepting_actions());
        state.is_round_over = true;
        assert!(!state.accepting_actions(), "round over");
    }

    #[test]
    fn test_pending_actions_wire_shape_uses_numeric_keys() {
        let mut pending = PendingActions::default();
        pending.set(PlayerId::ONE, Action::Reload);
        let json: serde_json::Value = serde_json::to_value(&pending).unwrap();
        assert_eq!(json["1"], "reload");
        assert!(json["2"].is_null());
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let state = GameState::new("Ana", DuelConfig::tactico());
        let bytes = serde_json::to_vec(&state).unwrap();
        let decoded: GameState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(state, decoded);
    }
}
