//! The simultaneous-action turn resolution engine.
//!
//! Both committed actions are resolved in a fixed phase order — block,
//! reload, attack, turtle penalty — because later phases read flags the
//! earlier ones settle (an attack must see whether the defender's block
//! held). Within a phase both players are processed; outcomes never
//! depend on the other player's same-phase result except where the rules
//! say so (intimidation, attacking into the opponent's block).
//!
//! Special events are rare probabilistic modifiers. Per player per turn
//! at most one may fire in the actor role (attached to the player's own
//! action) and one in the target role (suffered as a defender/victim);
//! the [`SpecialLedger`] carries those two flags through the phases
//! explicitly. Every special is disabled wholesale when the room's
//! precise-shot chance is zero.

use crate::{round, Action, Dice, DuelConfig, GameState, Player, PlayerId};

/// Result of one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Round continues — the room should enter the resolved-pause and
    /// then open the next selection window.
    Continue,
    /// Round ended; `None` is a draw.
    RoundOver { winner: Option<PlayerId> },
}

/// Per-turn record of which special slots have fired.
///
/// One actor slot and one target slot per player, reset every turn by
/// construction. A failed roll leaves its slot open; only a fired event
/// claims it.
#[derive(Debug, Clone, Copy, Default)]
struct SpecialLedger {
    actor: [bool; 2],
    target: [bool; 2],
}

impl SpecialLedger {
    fn fire_actor(&mut self, i: usize, dice: &mut impl Dice, chance: f64) -> bool {
        if chance <= 0.0 || self.actor[i] {
            return false;
        }
        if dice.chance(chance) {
            self.actor[i] = true;
            return true;
        }
        false
    }

    fn fire_target(&mut self, i: usize, dice: &mut impl Dice, chance: f64) -> bool {
        if chance <= 0.0 || self.target[i] {
            return false;
        }
        if dice.chance(chance) {
            self.target[i] = true;
            return true;
        }
        false
    }
}

/// Records a submitted action if the room currently accepts one.
///
/// Silently refuses synthetic `afk`, submissions outside an open
/// selection window, and duplicates — none of these are errors a client
/// hears about. Returns whether the action was accepted.
pub fn submit_action(state: &mut GameState, player: PlayerId, action: Action) -> bool {
    if action == Action::Afk || !state.accepting_actions() {
        return false;
    }
    if state.pending_actions.get(player).is_some() {
        return false;
    }
    state.pending_actions.set(player, action);
    state.player_mut(player).afk_turns = 0;
    let name = state.player(player).name.clone();
    state.push_log(format!("{name} has chosen an action."));
    true
}

/// Fills the empty action slots after the countdown expired.
///
/// A player who missed the window gets a weighted random action (34%
/// attack / 33% reload / 33% block, reload-or-block 50/50 when dry) —
/// unless their missed-turn streak has reached the AFK limit, in which
/// case the engine substitutes `afk` and resets that streak.
pub fn auto_fill_actions(state: &mut GameState, dice: &mut impl Dice) {
    if state.pending_actions.both_chosen() {
        return;
    }
    state.push_log("Time's up — actions are chosen automatically.");
    let afk_limit = state.config.afk_limit;
    for id in [PlayerId::ONE, PlayerId::TWO] {
        if state.pending_actions.get(id).is_some() {
            continue;
        }
        let player = state.player_mut(id);
        player.afk_turns += 1;
        let action = if player.afk_turns >= afk_limit {
            player.afk_turns = 0;
            Action::Afk
        } else {
            random_action(player.ammo, dice)
        };
        state.pending_actions.set(id, action);
    }
}

fn random_action(ammo: u32, dice: &mut impl Dice) -> Action {
    if ammo == 0 {
        return if dice.roll() < 0.5 { Action::Reload } else { Action::Block };
    }
    let r = dice.roll();
    if r < 0.34 {
        Action::Attack
    } else if r < 0.67 {
        Action::Reload
    } else {
        Action::Block
    }
}

/// Resolves one turn from the two pending actions.
///
/// Precondition: both pending slots are filled (real or auto-filled);
/// if not, this is a no-op returning [`TurnOutcome::Continue`].
pub fn resolve_turn(state: &mut GameState, dice: &mut impl Dice) -> TurnOutcome {
    let (Some(a1), Some(a2)) = (state.pending_actions.one, state.pending_actions.two) else {
        return TurnOutcome::Continue;
    };
    let actions = [a1, a2];
    let config = state.config.clone();
    let spec_on = config.specials_enabled();
    let mut ledger = SpecialLedger::default();
    let mut log: Vec<String> = Vec::new();

    // Intimidation factors from the pre-turn stats.
    let intim = [
        intimidation_factor(&config, &state.players[0], &state.players[1]),
        intimidation_factor(&config, &state.players[1], &state.players[0]),
    ];

    state.total_turns += 1;
    for player in &mut state.players {
        player.is_blocking = false;
    }
    for i in 0..2 {
        if actions[i] == Action::Afk {
            log.push(format!("{} is AFK and loses the turn.", state.players[i].name));
        }
    }

    block_phase(state, &actions, &config, spec_on, &intim, &mut ledger, dice, &mut log);
    reload_phase(state, &actions, &config, spec_on, &intim, &mut ledger, dice, &mut log);
    for i in 0..2 {
        if actions[i] == Action::Attack {
            attack_phase(
                &mut state.players,
                i,
                &config,
                spec_on,
                &intim,
                &mut ledger,
                dice,
                &mut log,
            );
        }
    }
    turtle_phase(state, &actions, &config, spec_on, &intim, &mut ledger, dice, &mut log);

    for i in 0..2 {
        state.players[i].last_action = match actions[i] {
            Action::Afk => None,
            chosen => Some(chosen),
        };
    }

    for line in log {
        state.push_log(line);
    }
    conclude(state)
}

/// The trailing player suffers amplified negative events.
fn intimidation_factor(config: &DuelConfig, me: &Player, opponent: &Player) -> f64 {
    let hp_behind = opponent.hp.saturating_sub(me.hp) >= config.intimidation_hp_diff;
    let ammo_behind = opponent.ammo.saturating_sub(me.ammo) >= config.intimidation_ammo_diff;
    if hp_behind || ammo_behind {
        config.intimidation_multiplier
    } else {
        1.0
    }
}

fn gated(spec_on: bool, chance: f64) -> f64 {
    if spec_on { chance } else { 0.0 }
}

#[allow(clippy::too_many_arguments)]
fn block_phase(
    state: &mut GameState,
    actions: &[Action; 2],
    config: &DuelConfig,
    spec_on: bool,
    intim: &[f64; 2],
    ledger: &mut SpecialLedger,
    dice: &mut impl Dice,
    log: &mut Vec<String>,
) {
    for i in 0..2 {
        if actions[i] != Action::Block {
            state.players[i].consecutive_blocks = 0;
            continue;
        }
        let player = &mut state.players[i];
        player.consecutive_blocks += 1;
        if player.consecutive_blocks > config.max_consecutive_blocks {
            // Shields tire out: the counter clamps and the block fails.
            player.consecutive_blocks = config.max_consecutive_blocks;
            log.push(format!(
                "{}'s shield arm gives out — no more hiding this turn.",
                player.name
            ));
        } else if player.shield_weakened
            && ledger.fire_target(i, dice, gated(spec_on, config.shield_weaken_chance) * intim[i])
        {
            player.shield_weakened = false;
            log.push(format!(
                "{}'s weakened shield gives way — the block fails!",
                player.name
            ));
        } else {
            player.is_blocking = true;
            log.push(format!("{} takes guard behind the shield.", player.name));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn reload_phase(
    state: &mut GameState,
    actions: &[Action; 2],
    config: &DuelConfig,
    spec_on: bool,
    intim: &[f64; 2],
    ledger: &mut SpecialLedger,
    dice: &mut impl Dice,
    log: &mut Vec<String>,
) {
    for i in 0..2 {
        if actions[i] != Action::Reload {
            continue;
        }
        let player = &mut state.players[i];
        if player.ammo >= config.max_ammo {
            log.push(format!(
                "{} reloads, but the chamber is already full.",
                player.name
            ));
        } else if ledger.fire_actor(i, dice, gated(spec_on, config.double_reload_chance)) {
            player.ammo = (player.ammo + 2).min(config.max_ammo);
            log.push(format!(
                "{} slams in two rounds at once! Ammo: {}.",
                player.name, player.ammo
            ));
        } else if ledger.fire_actor(i, dice, gated(spec_on, config.reload_drop_chance) * intim[i]) {
            player.ammo = player.ammo.saturating_sub(1);
            log.push(format!(
                "{} fumbles the reload and drops a round. Ammo: {}.",
                player.name, player.ammo
            ));
        } else {
            player.ammo += 1;
            log.push(format!("{} reloads. Ammo: {}.", player.name, player.ammo));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn attack_phase(
    players: &mut [Player; 2],
    attacker: usize,
    config: &DuelConfig,
    spec_on: bool,
    intim: &[f64; 2],
    ledger: &mut SpecialLedger,
    dice: &mut impl Dice,
    log: &mut Vec<String>,
) {
    let defender = 1 - attacker;
    let a_name = players[attacker].name.clone();
    let d_name = players[defender].name.clone();

    if players[attacker].ammo == 0 {
        log.push(format!("{a_name} pulls the trigger on an empty chamber."));
        players[attacker].consecutive_hits = 0;
        return;
    }

    // Leads are snapshotted before the shot is paid for.
    let hp_lead = players[attacker].hp.saturating_sub(players[defender].hp);
    let ammo_lead = players[attacker].ammo.saturating_sub(players[defender].ammo);

    // (a) weapon jam: the shot is cancelled, no ammo spent.
    if ledger.fire_actor(
        attacker,
        dice,
        gated(spec_on, config.weapon_jam_chance) * intim[attacker],
    ) {
        log.push(format!(
            "{a_name}'s revolver jams! The shot never leaves the barrel."
        ));
        players[attacker].consecutive_hits = 0;
        return;
    }
    players[attacker].ammo -= 1;

    // (b) nervous shot: a clearly leading attacker can fire wide, after
    // the round is already spent.
    if (hp_lead >= 2 || ammo_lead >= 2)
        && ledger.fire_actor(attacker, dice, gated(spec_on, config.nervous_miss_chance))
    {
        log.push(format!("{a_name} gets overconfident and fires wide."));
        players[attacker].consecutive_hits = 0;
        return;
    }

    // (c) precise shot: +0.10 on a hot streak, capped at 0.50.
    let mut crit_chance = gated(spec_on, config.precise_shot_chance);
    if crit_chance > 0.0 && players[attacker].consecutive_hits >= 2 {
        crit_chance = (crit_chance + 0.10).min(0.50);
    }
    let is_crit = ledger.fire_actor(attacker, dice, crit_chance);

    // (d) the defender's block, unless a crit slips straight through.
    if players[defender].is_blocking && !is_crit {
        if ledger.fire_target(defender, dice, gated(spec_on, config.perfect_block_chance)) {
            log.push(format!(
                "{d_name} times a perfect block — the bullet ricochets back at {a_name}!"
            ));
            damage_pipeline(players, attacker, false, &d_name, config, spec_on, ledger, dice, log);
            players[attacker].consecutive_hits = 0;
            return;
        }
        log.push(format!("{d_name} blocks {a_name}'s shot."));
        players[attacker].consecutive_hits = 0;
        if !players[defender].shield_weakened
            && ledger.fire_target(defender, dice, gated(spec_on, config.shield_weaken_chance))
        {
            players[defender].shield_weakened = true;
            log.push(format!("{d_name}'s shield cracks under the impact."));
        }
        return;
    }

    // (e) damage lands on the defender (or is dodged / survived).
    let landed = damage_pipeline(
        players, defender, is_crit, &a_name, config, spec_on, ledger, dice, log,
    );
    if !landed {
        players[attacker].consecutive_hits = 0;
        return;
    }
    players[attacker].consecutive_hits += 1;

    // (f) ghost bullet: a landed shot may refund its round.
    if ledger.fire_actor(attacker, dice, gated(spec_on, config.ghost_bullet_chance)) {
        players[attacker].ammo = (players[attacker].ammo + 1).min(config.max_ammo);
        log.push(format!(
            "A ghost bullet! {a_name} finds the spent round back in the chamber."
        ));
    }
}

/// Applies one point of damage to `victim`, letting the victim-side
/// specials intervene. Returns whether the hit landed (a last-stand
/// save still counts as landed; a dodge does not).
#[allow(clippy::too_many_arguments)]
fn damage_pipeline(
    players: &mut [Player; 2],
    victim: usize,
    is_crit: bool,
    shooter_name: &str,
    config: &DuelConfig,
    spec_on: bool,
    ledger: &mut SpecialLedger,
    dice: &mut impl Dice,
    log: &mut Vec<String>,
) -> bool {
    let v_name = players[victim].name.clone();

    // Miracle dodge only saves a victim caught in the open.
    if !players[victim].is_blocking
        && ledger.fire_target(victim, dice, gated(spec_on, config.miracle_dodge_chance))
    {
        log.push(format!(
            "{v_name} twists aside at the last instant — a miracle dodge!"
        ));
        return false;
    }

    let player = &mut players[victim];
    if player.hp == 1
        && !player.last_stand_used
        && ledger.fire_target(victim, dice, gated(spec_on, config.last_stand_chance))
    {
        player.last_stand_used = true;
        log.push(format!(
            "{v_name} refuses to fall — a last stand keeps them on 1 hp!"
        ));
        return true;
    }

    player.hp = player.hp.saturating_sub(1);
    if is_crit {
        log.push(format!(
            "{shooter_name} lands a precise shot straight through {v_name}'s guard! 1 hp lost."
        ));
    } else {
        log.push(format!("{shooter_name} hits {v_name}. 1 hp lost."));
    }
    true
}

#[allow(clippy::too_many_arguments)]
fn turtle_phase(
    state: &mut GameState,
    actions: &[Action; 2],
    config: &DuelConfig,
    spec_on: bool,
    intim: &[f64; 2],
    ledger: &mut SpecialLedger,
    dice: &mut impl Dice,
    log: &mut Vec<String>,
) {
    for i in 0..2 {
        if actions[i] == Action::Attack {
            state.players[i].turns_without_attack = 0;
        } else {
            state.players[i].turns_without_attack += 1;
        }
    }
    if config.max_turtle_turns_without_attack == 0 || !spec_on {
        return;
    }
    for i in 0..2 {
        let player = &mut state.players[i];
        if player.turns_without_attack < config.max_turtle_turns_without_attack
            || player.ammo == 0
        {
            continue;
        }
        if ledger.fire_target(i, dice, config.turtle_drop_chance * intim[i]) {
            player.ammo -= 1;
            // The streak resets only when the drop actually happens; a
            // failed roll leaves the player exposed next turn too.
            player.turns_without_attack = 0;
            log.push(format!(
                "{} has been hiding too long — a round slips from the belt. Ammo: {}.",
                player.name, player.ammo
            ));
        } else {
            log.push(format!(
                "{} fumbles nervously with the ammo belt, but holds on.",
                player.name
            ));
        }
    }
}

/// Round-end evaluation after all phases.
fn conclude(state: &mut GameState) -> TurnOutcome {
    let p1_down = state.players[0].is_down();
    let p2_down = state.players[1].is_down();
    match (p1_down, p2_down) {
        (true, true) => {
            round::finish_round(state, None);
            TurnOutcome::RoundOver { winner: None }
        }
        (true, false) => {
            round::finish_round(state, Some(PlayerId::TWO));
            TurnOutcome::RoundOver {
                winner: Some(PlayerId::TWO),
            }
        }
        (false, true) => {
            round::finish_round(state, Some(PlayerId::ONE));
            TurnOutcome::RoundOver {
                winner: Some(PlayerId::ONE),
            }
        }
        (false, false) => {
            if state.players.iter().all(|p| p.ammo == 0) {
                state.push_log("Both guns are empty. The duelists eye each other across the dust...");
            }
            // Resolved-pause: countdown hidden until the next window opens.
            state.turn_ends_at = None;
            TurnOutcome::Continue
        }
    }
}
