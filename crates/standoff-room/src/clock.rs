//! Single-alarm timer driving a room's turn cycle.
//!
//! A room is only ever waiting for one thing at a time: the selection
//! window closing, or the post-resolution pause ending. [`TurnClock`]
//! models exactly that — one optional armed alarm.
//!
//! It is designed to sit inside the room actor's `tokio::select!` loop:
//!
//! ```text
//! tokio::select! {
//!     cmd = receiver.recv() => { ... }
//!     alarm = clock.fired() => { ... }
//! }
//! ```
//!
//! When nothing is armed, [`TurnClock::fired`] pends forever and the
//! loop reacts to commands only.

use std::time::Duration;

use tokio::time::{self, Instant};

/// What the room is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alarm {
    /// The selection window closed: auto-fill missing actions and
    /// resolve the turn.
    TurnDeadline,
    /// The resolved-pause ended: open the next selection window.
    PauseOver,
}

/// The room's one optional armed alarm.
#[derive(Debug, Default)]
pub struct TurnClock {
    armed: Option<(Alarm, Instant)>,
}

impl TurnClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `alarm` to fire after `delay`, replacing any previous alarm.
    pub fn arm(&mut self, alarm: Alarm, delay: Duration) {
        self.armed = Some((alarm, Instant::now() + delay));
    }

    /// Cancels the armed alarm, if any.
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Completes when the armed alarm fires, disarming it.
    ///
    /// Pends forever while nothing is armed — `tokio::select!` keeps
    /// processing the other branches.
    pub async fn fired(&mut self) -> Alarm {
        let (alarm, at) = match self.armed {
            Some(armed) => armed,
            None => std::future::pending().await,
        };
        time::sleep_until(at).await;
        self.armed = None;
        alarm
    }
}
