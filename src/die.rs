//! Die-size ladder.
//!
//! A stat's die occupies one rung of a fixed ladder of face counts. Growth
//! and situational bonuses move the die up the ladder; nothing can move it
//! past the top rung.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Face counts a stat die can occupy, smallest to largest.
pub const LADDER: [u8; 6] = [4, 6, 8, 10, 12, 20];

/// Index of the top rung of the ladder.
pub const CEILING: usize = LADDER.len() - 1;

/// Compute the effective ladder index for a base level and bonus count.
///
/// This clamp is the central invariant of the sheet: a stat can never
/// exceed the largest die regardless of growth or bonus stacking.
///
/// # Examples
///
/// ```rust
/// use diesheet::die::{effective_index, CEILING};
///
/// assert_eq!(effective_index(0, 0), 0);
/// assert_eq!(effective_index(2, 1), 3);
/// assert_eq!(effective_index(5, 2), CEILING);
/// ```
pub fn effective_index(base_level: u8, bonus_count: u8) -> usize {
    (base_level as usize + bonus_count as usize).min(CEILING)
}

/// A concrete die, identified by its ladder rung.
///
/// # Examples
///
/// ```rust
/// use diesheet::DieSize;
///
/// let die = DieSize::from_index(3);
/// assert_eq!(die.faces(), 10);
/// assert_eq!(die.to_string(), "D10");
/// assert!(!die.is_ceiling());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DieSize(u8);

impl DieSize {
    /// The smallest die (D4).
    pub const D4: DieSize = DieSize(0);
    /// D6.
    pub const D6: DieSize = DieSize(1);
    /// D8.
    pub const D8: DieSize = DieSize(2);
    /// D10.
    pub const D10: DieSize = DieSize(3);
    /// D12.
    pub const D12: DieSize = DieSize(4);
    /// The largest die (D20).
    pub const D20: DieSize = DieSize(CEILING as u8);

    /// Die at the given ladder index, clamped to the ceiling.
    pub fn from_index(index: usize) -> Self {
        Self(index.min(CEILING) as u8)
    }

    /// Die reached from a base level plus a bonus count.
    pub fn effective(base_level: u8, bonus_count: u8) -> Self {
        Self::from_index(effective_index(base_level, bonus_count))
    }

    /// Ladder index of this die.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Number of faces on this die.
    pub fn faces(self) -> u8 {
        LADDER[self.index()]
    }

    /// Whether this die is the top of the ladder.
    pub fn is_ceiling(self) -> bool {
        self.index() == CEILING
    }
}

impl fmt::Display for DieSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.faces())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_index_matches_min_rule() {
        for base in 0..=5u8 {
            for bonus in 0..=2u8 {
                let expected = ((base + bonus) as usize).min(5);
                assert_eq!(effective_index(base, bonus), expected);
                assert_eq!(DieSize::effective(base, bonus).faces(), LADDER[expected]);
            }
        }
    }

    #[test]
    fn test_from_index_clamps() {
        assert_eq!(DieSize::from_index(99), DieSize::D20);
        assert_eq!(DieSize::from_index(99).faces(), 20);
    }

    #[test]
    fn test_die_ordering_follows_ladder() {
        assert!(DieSize::D4 < DieSize::D6);
        assert!(DieSize::D12 < DieSize::D20);
        assert!(DieSize::D20.is_ceiling());
        assert!(!DieSize::D12.is_ceiling());
    }

    #[test]
    fn test_display() {
        assert_eq!(DieSize::D4.to_string(), "D4");
        assert_eq!(DieSize::D20.to_string(), "D20");
    }
}
