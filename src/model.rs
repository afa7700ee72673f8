//! Stat model.
//!
//! Holds the per-stat growth state (base level on the die ladder) and the
//! per-stat roll state used as the reentrancy guard. The effective die is
//! a pure function of the base level and a [`BonusSource`].

use crate::die::{DieSize, CEILING};
use crate::source::BonusSource;
use crate::stat::Stat;

/// Whether a roll sequence is in flight for a stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollState {
    #[default]
    Idle,
    Resolving,
}

/// Growth and roll state for all six stats.
///
/// # Examples
///
/// ```rust
/// use diesheet::{StatModel, Stat, DieSize};
/// use diesheet::source::NoBonus;
///
/// let mut model = StatModel::new();
/// assert_eq!(model.effective_die(Stat::Focus, &NoBonus), DieSize::D4);
///
/// model.grow(Stat::Focus);
/// assert_eq!(model.effective_die(Stat::Focus, &NoBonus), DieSize::D6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatModel {
    base: [u8; 6],
    state: [RollState; 6],
}

impl StatModel {
    /// Every stat at base level 0, nothing in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current base level of a stat (0..=5).
    pub fn base_level(&self, stat: Stat) -> u8 {
        self.base[stat.index()]
    }

    /// Effective die of a stat under the given bonuses.
    pub fn effective_die(&self, stat: Stat, bonus: &impl BonusSource) -> DieSize {
        DieSize::effective(self.base_level(stat), bonus.bonus_count(stat))
    }

    /// Effective die of every stat, in sheet order.
    pub fn effective_dice(&self, bonus: &impl BonusSource) -> [DieSize; 6] {
        Stat::ALL.map(|stat| self.effective_die(stat, bonus))
    }

    /// Raise a stat's base level by one step.
    ///
    /// Saturates at the top of the ladder; growing a maxed stat is a no-op.
    /// Returns whether the level changed.
    pub fn grow(&mut self, stat: Stat) -> bool {
        let level = &mut self.base[stat.index()];
        if (*level as usize) < CEILING {
            *level += 1;
            true
        } else {
            false
        }
    }

    /// Set a stat's base level directly, clamped to the ladder.
    ///
    /// Bypasses the roll mechanic entirely. Returns whether the level
    /// changed.
    pub fn set_level(&mut self, stat: Stat, level: i32) -> bool {
        let clamped = level.clamp(0, CEILING as i32) as u8;
        let slot = &mut self.base[stat.index()];
        let changed = *slot != clamped;
        *slot = clamped;
        changed
    }

    /// Reset every base level to 0 and clear every roll state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current roll state of a stat.
    pub fn roll_state(&self, stat: Stat) -> RollState {
        self.state[stat.index()]
    }

    /// Whether a roll sequence is in flight for a stat.
    pub fn is_busy(&self, stat: Stat) -> bool {
        self.roll_state(stat) == RollState::Resolving
    }

    /// Move a stat into `Resolving`.
    ///
    /// Returns `false` if it was already resolving; the caller must then
    /// drop the request.
    pub fn begin_roll(&mut self, stat: Stat) -> bool {
        let state = &mut self.state[stat.index()];
        if *state == RollState::Resolving {
            return false;
        }
        *state = RollState::Resolving;
        true
    }

    /// Return a stat to `Idle`. Idempotent.
    pub fn end_roll(&mut self, stat: Stat) {
        self.state[stat.index()] = RollState::Idle;
    }
}
