//! Die rollers.
//!
//! The only place randomness enters the sheet. A roller draws a uniform
//! integer in `[1, faces]`; draws are independent across calls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of die draws.
pub trait DieRoller {
    /// Draw a uniformly random face in `[1, faces]`.
    fn roll(&mut self, faces: u8) -> u8;
}

/// Roller backed by any `rand` generator.
///
/// # Examples
///
/// ```rust
/// use diesheet::roller::{DieRoller, RngRoller};
///
/// let mut roller = RngRoller::seeded(7);
/// let face = roller.roll(20);
/// assert!((1..=20).contains(&face));
/// ```
#[derive(Debug, Clone)]
pub struct RngRoller<R> {
    rng: R,
}

impl<R: Rng> RngRoller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngRoller<StdRng> {
    /// A roller seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// A reproducible roller.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DieRoller for RngRoller<R> {
    fn roll(&mut self, faces: u8) -> u8 {
        self.rng.gen_range(1..=faces)
    }
}

/// Roller that replays a fixed sequence of draws.
///
/// Each scripted value is clamped into `[1, faces]` for the die actually
/// rolled. Once the script runs out every draw is a 1, which is never a
/// maximum face on the ladder, so any sequence ends.
///
/// # Examples
///
/// ```rust
/// use diesheet::roller::{DieRoller, ScriptedRoller};
///
/// let mut roller = ScriptedRoller::new([4, 3]);
/// assert_eq!(roller.roll(4), 4);
/// assert_eq!(roller.roll(6), 3);
/// assert_eq!(roller.roll(6), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    draws: VecDeque<u8>,
}

impl ScriptedRoller {
    pub fn new(draws: impl IntoIterator<Item = u8>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Draws not yet consumed.
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl DieRoller for ScriptedRoller {
    fn roll(&mut self, faces: u8) -> u8 {
        self.draws.pop_front().unwrap_or(1).clamp(1, faces)
    }
}

impl<T: DieRoller + ?Sized> DieRoller for Box<T> {
    fn roll(&mut self, faces: u8) -> u8 {
        (**self).roll(faces)
    }
}
