//! The events clients and server exchange, in the exact JSON shapes the
//! duel clients speak: internally tagged with `type`, camelCase fields.

use serde::{Deserialize, Serialize};
use standoff_engine::{Action, CustomOverrides, GameState, PlayerId};

use crate::RoomCode;

/// Client → server events.
///
/// `chooseAction` carries any [`Action`] the wire can name, including
/// `afk`; the room silently refuses the synthetic ones, so a mischievous
/// client gains nothing by sending them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Open a new room and take seat 1.
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        player_name: String,
        /// Mode name; unknown or missing falls back to the default mode.
        #[serde(default)]
        mode: Option<String>,
        /// Only consulted when `mode` is `custom`.
        #[serde(default)]
        custom_config: Option<CustomOverrides>,
    },
    /// Take seat 2 in an existing room.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: RoomCode,
        player_name: String,
    },
    /// Commit an action for the current turn.
    #[serde(rename_all = "camelCase")]
    ChooseAction { room_id: RoomCode, action: Action },
    /// Request a rematch after a finished round.
    #[serde(rename_all = "camelCase")]
    NextRound { room_id: RoomCode },
}

/// Server → client events.
///
/// State-bearing events carry the full [`GameState`]; clients re-render
/// from scratch on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: RoomCode,
        player_id: PlayerId,
        state: Box<GameState>,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: RoomCode,
        player_id: PlayerId,
        state: Box<GameState>,
    },
    StateUpdate { state: Box<GameState> },
    ErrorMessage { message: String },
}

impl ServerEvent {
    pub fn state_update(state: &GameState) -> Self {
        Self::StateUpdate {
            state: Box::new(state.clone()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::ErrorMessage {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standoff_engine::DuelConfig;

    #[test]
    fn test_create_room_decodes_from_client_json() {
        let json = r#"{
            "type": "createRoom",
            "playerName": "Ana",
            "mode": "custom",
            "customConfig": { "hpPerPlayer": 7 }
        }"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        match event {
            ClientEvent::CreateRoom {
                player_name,
                mode,
                custom_config,
            } => {
                assert_eq!(player_name, "Ana");
                assert_eq!(mode.as_deref(), Some("custom"));
                assert_eq!(custom_config.unwrap().hp_per_player, Some(7));
            }
            other => panic!("wrong event: {other:?}"),
        }
    }

    #[test]
    fn test_create_room_mode_and_config_are_optional() {
        let json = r#"{ "type": "createRoom", "playerName": "Ana" }"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(
            event,
            ClientEvent::CreateRoom {
                mode: None,
                custom_config: None,
                ..
            }
        ));
    }

    #[test]
    fn test_choose_action_decodes_lowercase_action() {
        let json = r#"{ "type": "chooseAction", "roomId": "AB12CD", "action": "attack" }"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            ClientEvent::ChooseAction {
                room_id: RoomCode::from("AB12CD"),
                action: Action::Attack,
            }
        );
    }

    #[test]
    fn test_join_room_round_trip() {
        let event = ClientEvent::JoinRoom {
            room_id: RoomCode::from("XY99ZZ"),
            player_name: "Bo".into(),
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ClientEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_unknown_client_event_type_fails_to_decode() {
        let json = r#"{ "type": "launchMissile", "roomId": "AB12CD" }"#;
        let result: Result<ClientEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_room_created_json_shape() {
        let state = GameState::new("Ana", DuelConfig::tactico());
        let event = ServerEvent::RoomCreated {
            room_id: RoomCode::from("AB12CD"),
            player_id: PlayerId::ONE,
            state: Box::new(state),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "roomCreated");
        assert_eq!(json["roomId"], "AB12CD");
        assert_eq!(json["playerId"], 1);
        assert_eq!(json["state"]["players"][0]["name"], "Ana");
        assert_eq!(json["state"]["gameStarted"], false);
        assert!(json["state"]["pendingActions"]["1"].is_null());
    }

    #[test]
    fn test_state_update_json_shape() {
        let state = GameState::new("Ana", DuelConfig::normal());
        let json: serde_json::Value =
            serde_json::to_value(ServerEvent::state_update(&state)).unwrap();

        assert_eq!(json["type"], "stateUpdate");
        assert_eq!(json["state"]["round"], 1);
        assert_eq!(json["state"]["config"]["maxAmmo"], 3);
        assert!(json["state"]["turnEndsAt"].is_null());
    }

    #[test]
    fn test_error_message_json_shape() {
        let json: serde_json::Value =
            serde_json::to_value(ServerEvent::error("Room not found")).unwrap();
        assert_eq!(json["type"], "errorMessage");
        assert_eq!(json["message"], "Room not found");
    }

    #[test]
    fn test_server_event_round_trip() {
        let state = GameState::new("Ana", DuelConfig::tactico());
        let event = ServerEvent::RoomJoined {
            room_id: RoomCode::from("AB12CD"),
            player_id: PlayerId::TWO,
            state: Box::new(state),
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}
