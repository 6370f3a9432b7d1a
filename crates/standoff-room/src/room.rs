//! Room actor: an isolated Tokio task that owns one duel.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel — no shared mutable state, just message
//! passing. The actor owns the [`GameState`], the [`TurnClock`], and an
//! outbound channel per seat; everything that mutates the duel happens
//! on this one task, so the engine never needs a lock.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use standoff_engine::{
    auto_fill_actions, resolve_turn, round, submit_action, Action, Dice, DuelConfig, GameState,
    PlayerId, TurnOutcome,
};
use standoff_protocol::{RoomCode, ServerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::{Alarm, RoomError, TurnClock};

/// Delay after a non-terminal resolution before the next selection
/// window opens, giving clients time to animate the outcome.
pub const RESOLVED_PAUSE: Duration = Duration::from_millis(2000);

/// Channel on which a room pushes events to one connection.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
///
/// Join and leave carry a reply channel; action and rematch requests are
/// fire-and-forget — their only observable effect is a broadcast.
pub(crate) enum RoomCommand {
    Join {
        name: String,
        sender: EventSender,
        reply: oneshot::Sender<Result<(PlayerId, GameState), RoomError>>,
    },
    ChooseAction {
        player: PlayerId,
        action: Action,
    },
    NextRound {
        player: PlayerId,
    },
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<GameState>,
    },
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Seats a second player, starting the duel.
    ///
    /// On success returns the assigned seat and the state snapshot to
    /// put in the `roomJoined` reply.
    pub async fn join(
        &self,
        name: String,
        sender: EventSender,
    ) -> Result<(PlayerId, GameState), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Commits an action for the current turn (fire-and-forget).
    pub async fn choose_action(&self, player: PlayerId, action: Action) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::ChooseAction { player, action })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Requests a rematch after a finished round (fire-and-forget).
    pub async fn next_round(&self, player: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::NextRound { player })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Vacates a seat. Returns `true` when the room is now empty and its
    /// actor is shutting down — the caller should drop it from the
    /// registry.
    pub async fn leave(&self, player: PlayerId) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// The current duel state.
    pub async fn snapshot(&self) -> Result<GameState, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<D: Dice> {
    code: RoomCode,
    state: GameState,
    clock: TurnClock,
    /// Outbound channels by seat index; `None` is an empty seat.
    senders: [Option<EventSender>; 2],
    receiver: mpsc::Receiver<RoomCommand>,
    dice: D,
}

impl<D: Dice + Send + 'static> RoomActor<D> {
    async fn run(mut self) {
        tracing::info!(room = %self.code, "room opened");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd) {
                            break;
                        }
                    }
                    None => break,
                },
                alarm = self.clock.fired() => self.handle_alarm(alarm),
            }
        }

        tracing::info!(room = %self.code, "room closed");
    }

    /// Returns `true` when the room should shut down.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                name,
                sender,
                reply,
            } => {
                let _ = reply.send(self.handle_join(name, sender));
            }
            RoomCommand::ChooseAction { player, action } => {
                self.handle_choose(player, action);
            }
            RoomCommand::NextRound { player } => self.handle_next_round(player),
            RoomCommand::Leave { player, reply } => {
                let empty = self.handle_leave(player);
                let _ = reply.send(empty);
                return empty;
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.state.clone());
            }
        }
        false
    }

    fn handle_join(
        &mut self,
        name: String,
        sender: EventSender,
    ) -> Result<(PlayerId, GameState), RoomError> {
        if self.state.game_started || self.senders[1].is_some() {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        let name = if name.trim().is_empty() {
            "Player 2".to_owned()
        } else {
            name
        };
        self.state.players[1].name = name;
        self.senders[1] = Some(sender);
        self.state.game_started = true;
        let joined = self.state.players[1].name.clone();
        self.state.push_log(format!("{joined} has joined the duel."));
        self.start_turn();
        tracing::info!(room = %self.code, player = %joined, "second player seated, duel started");

        let snapshot = self.state.clone();
        // The joiner is brought current by the reply; only the host
        // needs the update.
        self.send_to(PlayerId::ONE, ServerEvent::state_update(&self.state));
        Ok((PlayerId::TWO, snapshot))
    }

    /// One seat's view of the state: while the selection window is open
    /// the opponent's committed action is masked, so an early pick leaks
    /// nothing before resolution. The log still announces that a choice
    /// was made.
    fn visible_state(&self, seat: usize) -> GameState {
        let mut state = self.state.clone();
        if state.accepting_actions() {
            if seat == 0 {
                state.pending_actions.two = None;
            } else {
                state.pending_actions.one = None;
            }
        }
        state
    }

    fn handle_choose(&mut self, player: PlayerId, action: Action) {
        if self.senders[player.index()].is_none() {
            return;
        }
        if !submit_action(&mut self.state, player, action) {
            tracing::debug!(room = %self.code, %player, ?action, "action refused");
            return;
        }
        if self.state.pending_actions.both_chosen() {
            self.resolve();
        } else {
            self.broadcast_state();
        }
    }

    fn handle_next_round(&mut self, player: PlayerId) {
        if self.senders[player.index()].is_none() {
            return;
        }
        // A rematch needs an opponent.
        if self.senders.iter().any(Option::is_none) {
            return;
        }
        if round::next_round(&mut self.state) {
            self.start_turn();
            self.broadcast_state();
        }
    }

    /// Returns `true` when the room is now empty.
    fn handle_leave(&mut self, player: PlayerId) -> bool {
        if self.senders[player.index()].take().is_none() {
            return self.senders.iter().all(Option::is_none);
        }
        self.clock.disarm();
        if let Some(winner) = round::forfeit_disconnect(&mut self.state, player) {
            tracing::info!(room = %self.code, %player, %winner, "round forfeited on disconnect");
        }
        // No further turns can start with an empty seat.
        self.state.game_started = false;
        self.state.turn_ends_at = None;
        self.broadcast_state();
        self.senders.iter().all(Option::is_none)
    }

    fn handle_alarm(&mut self, alarm: Alarm) {
        match alarm {
            Alarm::TurnDeadline => {
                // Stale if the turn already resolved or the duel ended.
                if !self.state.accepting_actions() {
                    return;
                }
                auto_fill_actions(&mut self.state, &mut self.dice);
                self.resolve();
            }
            Alarm::PauseOver => {
                if !self.state.game_started || self.state.is_round_over {
                    return;
                }
                self.start_turn();
                self.broadcast_state();
            }
        }
    }

    fn resolve(&mut self) {
        self.clock.disarm();
        match resolve_turn(&mut self.state, &mut self.dice) {
            TurnOutcome::Continue => self.clock.arm(Alarm::PauseOver, RESOLVED_PAUSE),
            TurnOutcome::RoundOver { winner } => {
                tracing::info!(room = %self.code, ?winner, "round over");
            }
        }
        self.broadcast_state();
    }

    /// Opens a selection window and arms its deadline.
    fn start_turn(&mut self) {
        let duration = self.state.config.turn_duration_ms;
        self.state.begin_turn(epoch_ms() + duration);
        self.clock
            .arm(Alarm::TurnDeadline, Duration::from_millis(duration));
    }

    fn broadcast_state(&self) {
        for (seat, sender) in self.senders.iter().enumerate() {
            if let Some(sender) = sender {
                let _ = sender.send(ServerEvent::state_update(&self.visible_state(seat)));
            }
        }
    }

    /// Drops silently if the seat is empty or its connection is gone.
    fn send_to(&self, player: PlayerId, event: ServerEvent) {
        if let Some(sender) = &self.senders[player.index()] {
            let _ = sender.send(event);
        }
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Spawns a room actor with the host in seat 1 and returns its handle
/// plus the initial state snapshot for the `roomCreated` reply.
pub(crate) fn spawn_room<D: Dice + Send + 'static>(
    code: RoomCode,
    host_name: &str,
    config: DuelConfig,
    host_sender: EventSender,
    dice: D,
) -> (RoomHandle, GameState) {
    let state = GameState::new(host_name, config);
    let snapshot = state.clone();
    let (tx, rx) = mpsc::channel(32);

    let actor = RoomActor {
        code: code.clone(),
        state,
        clock: TurnClock::new(),
        senders: [Some(host_sender), None],
        receiver: rx,
        dice,
    };
    tokio::spawn(actor.run());

    (RoomHandle { code, sender: tx }, snapshot)
}
