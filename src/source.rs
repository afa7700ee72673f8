//! Bonus sources.
//!
//! A bonus source answers the "current bonus selection" query: how many
//! situational bonuses (0, 1 or 2) apply to a stat right now. The stat
//! model and the roll resolver only ever see bonuses through this trait.

use crate::stat::Stat;
use std::collections::HashMap;

/// Trait for anything that can report the live bonus count for a stat.
///
/// # Examples
///
/// ```rust
/// use diesheet::{BonusSource, Stat};
/// use diesheet::source::NoBonus;
///
/// assert_eq!(NoBonus.bonus_count(Stat::Focus), 0);
/// ```
pub trait BonusSource {
    /// Number of bonus steps applied to `stat`.
    fn bonus_count(&self, stat: Stat) -> u8;
}

/// A source that never grants a bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBonus;

impl BonusSource for NoBonus {
    fn bonus_count(&self, _stat: Stat) -> u8 {
        0
    }
}

/// A map-based source, mostly useful for tests and tooling.
///
/// Stats missing from the map get no bonus.
///
/// # Examples
///
/// ```rust
/// use diesheet::{BonusSource, Stat};
/// use diesheet::source::MapBonus;
///
/// let mut bonus = MapBonus::empty();
/// bonus.insert(Stat::Style, 2);
///
/// assert_eq!(bonus.bonus_count(Stat::Style), 2);
/// assert_eq!(bonus.bonus_count(Stat::Focus), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapBonus {
    counts: HashMap<Stat, u8>,
}

impl MapBonus {
    /// Create a new empty `MapBonus`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the bonus count for a stat.
    pub fn insert(&mut self, stat: Stat, count: u8) {
        self.counts.insert(stat, count);
    }
}

impl BonusSource for MapBonus {
    fn bonus_count(&self, stat: Stat) -> u8 {
        self.counts.get(&stat).copied().unwrap_or(0)
    }
}

impl<T: BonusSource + ?Sized> BonusSource for &T {
    fn bonus_count(&self, stat: Stat) -> u8 {
        (**self).bonus_count(stat)
    }
}
