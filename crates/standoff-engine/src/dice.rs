//! The randomness seam for the resolution engine.
//!
//! Every probabilistic branch in the engine rolls through [`Dice`]
//! instead of calling `rand` directly, so the same resolution code runs
//! with real entropy in production ([`ThreadDice`]) and with a scripted
//! sequence in tests ([`ScriptedDice`]).

use std::collections::VecDeque;

use rand::Rng;

/// Source of uniform rolls in `[0, 1)`.
pub trait Dice {
    /// Returns the next uniform value in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Bernoulli trial: `true` with probability `p`.
    ///
    /// `p` is clamped to `[0, 1]`; a chance of exactly 0 never consumes
    /// a roll, so disabled specials leave scripted sequences untouched.
    fn chance(&mut self, p: f64) -> bool {
        let p = p.clamp(0.0, 1.0);
        if p <= 0.0 {
            return false;
        }
        self.roll() < p
    }
}

/// Production dice backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn roll(&mut self) -> f64 {
        rand::rng().random()
    }
}

/// Deterministic dice fed from a fixed sequence of rolls.
///
/// Once the sequence is exhausted every roll returns a value just under
/// 1.0, so remaining chance checks fail. An empty script therefore means
/// "no special ever fires".
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
}

impl ScriptedDice {
    /// Dice that roll the given values in order.
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    /// Dice for which no probabilistic event ever fires.
    pub fn never() -> Self {
        Self::default()
    }

    /// Number of scripted rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(1.0 - f64::EPSILON)
    }
}
