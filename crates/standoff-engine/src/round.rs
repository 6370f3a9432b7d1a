//! Round-over bookkeeping: scoring, rematches, and forfeits.

use crate::{GameState, PlayerId};

/// Closes the current round, awarding the point and narrating the
/// result. `None` is a draw — both duelists fell in the same exchange.
pub fn finish_round(state: &mut GameState, winner: Option<PlayerId>) {
    state.is_round_over = true;
    state.winner_id = winner;
    state.turn_ends_at = None;
    match winner {
        Some(id) => {
            state.player_mut(id).score += 1;
            let name = state.player(id).name.clone();
            state.push_log(format!("{name} wins the round!"));
        }
        None => {
            state.push_log("Both duelists fall. The round is a draw.");
        }
    }
    let [p1, p2] = &state.players;
    state.push_log(format!(
        "Score: {} {} — {} {}.",
        p1.name, p1.score, p2.name, p2.score
    ));
}

/// Starts the next round after a finished one, resetting both players
/// to round-1 combat stats while scores carry over.
///
/// Ignored (returns `false`) unless the current round is over — a stray
/// rematch request cannot reset a live duel.
pub fn next_round(state: &mut GameState) -> bool {
    if !state.is_round_over {
        return false;
    }
    state.round += 1;
    state.is_round_over = false;
    state.winner_id = None;
    state.pending_actions.clear();
    state.turn_ends_at = None;
    let config = state.config.clone();
    for player in &mut state.players {
        player.reset_for_round(&config);
    }
    state.push_log(format!("Round {} begins!", state.round));
    true
}

/// A duelist dropped mid-round: the opponent wins the round by forfeit.
///
/// Outside a live round (lobby, or the round already decided) there is
/// nothing to award; the departure is only narrated. Returns the forfeit
/// winner, if any.
pub fn forfeit_disconnect(state: &mut GameState, leaver: PlayerId) -> Option<PlayerId> {
    let name = state.player(leaver).name.clone();
    state.push_log(format!("{name} has left the duel."));
    if !state.game_started || state.is_round_over {
        return None;
    }
    let winner = leaver.other();
    finish_round(state, Some(winner));
    Some(winner)
}
