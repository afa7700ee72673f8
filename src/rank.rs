//! Rank derivation.
//!
//! A character's rank is derived from how many stats have reached each die
//! threshold. Tiers are ordered; each is gated by a minimum number of stats
//! at or above a die size, and the highest unlocked tier wins.

use crate::die::DieSize;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Rank tiers, lowest to highest. The textual form is the tier code stored
/// in documents.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Rank {
    #[default]
    E,
    D,
    C,
    B,
    A,
    S,
}

impl Rank {
    /// Tier code as stored in documents.
    pub fn code(&self) -> &str {
        self.as_ref()
    }
}

/// A tier's gate: at least `min_stats` stats at or above `die`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankThreshold {
    pub rank: Rank,
    pub die: DieSize,
    pub min_stats: usize,
}

/// Gates for every tier above the default, lowest first.
pub const RANK_THRESHOLDS: [RankThreshold; 5] = [
    RankThreshold {
        rank: Rank::D,
        die: DieSize::D6,
        min_stats: 4,
    },
    RankThreshold {
        rank: Rank::C,
        die: DieSize::D8,
        min_stats: 4,
    },
    RankThreshold {
        rank: Rank::B,
        die: DieSize::D10,
        min_stats: 4,
    },
    RankThreshold {
        rank: Rank::A,
        die: DieSize::D12,
        min_stats: 4,
    },
    RankThreshold {
        rank: Rank::S,
        die: DieSize::D20,
        min_stats: 6,
    },
];

/// How many stats sit at or above each die threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankCounts {
    pub at_least_d6: usize,
    pub at_least_d8: usize,
    pub at_least_d10: usize,
    pub at_least_d12: usize,
    pub at_d20: usize,
}

impl RankCounts {
    /// Count the stats meeting each threshold.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use diesheet::rank::RankCounts;
    /// use diesheet::DieSize;
    ///
    /// let counts = RankCounts::from_dice(&[DieSize::D6, DieSize::D10, DieSize::D20, DieSize::D4]);
    /// assert_eq!(counts.at_least_d6, 3);
    /// assert_eq!(counts.at_least_d10, 2);
    /// assert_eq!(counts.at_d20, 1);
    /// ```
    pub fn from_dice(dice: &[DieSize]) -> Self {
        let at_least = |floor: DieSize| dice.iter().filter(|&&d| d >= floor).count();
        Self {
            at_least_d6: at_least(DieSize::D6),
            at_least_d8: at_least(DieSize::D8),
            at_least_d10: at_least(DieSize::D10),
            at_least_d12: at_least(DieSize::D12),
            at_d20: at_least(DieSize::D20),
        }
    }

    /// Number of stats at or above `die`.
    pub fn at_least(&self, die: DieSize) -> usize {
        match die.index() {
            0 => usize::MAX,
            1 => self.at_least_d6,
            2 => self.at_least_d8,
            3 => self.at_least_d10,
            4 => self.at_least_d12,
            _ => self.at_d20,
        }
    }

    /// Highest tier these counts unlock.
    pub fn rank(&self) -> Rank {
        RANK_THRESHOLDS
            .iter()
            .filter(|t| self.at_least(t.die) >= t.min_stats)
            .map(|t| t.rank)
            .max()
            .unwrap_or_default()
    }
}

/// Derive the rank for a full set of effective dice.
///
/// Pure and idempotent: the same dice always give the same rank.
pub fn derive_rank(dice: &[DieSize]) -> Rank {
    RankCounts::from_dice(dice).rank()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_d4_is_rank_e() {
        assert_eq!(derive_rank(&[DieSize::D4; 6]), Rank::E);
    }

    #[test]
    fn test_four_d6_unlocks_d() {
        let dice = [
            DieSize::D6,
            DieSize::D6,
            DieSize::D6,
            DieSize::D6,
            DieSize::D4,
            DieSize::D4,
        ];
        assert_eq!(derive_rank(&dice), Rank::D);

        let three = [
            DieSize::D6,
            DieSize::D6,
            DieSize::D6,
            DieSize::D4,
            DieSize::D4,
            DieSize::D4,
        ];
        assert_eq!(derive_rank(&three), Rank::E);
    }

    #[test]
    fn test_higher_dice_count_toward_lower_thresholds() {
        let dice = [
            DieSize::D12,
            DieSize::D20,
            DieSize::D10,
            DieSize::D8,
            DieSize::D4,
            DieSize::D4,
        ];
        // Four stats at D8 or better, only three at D10 or better.
        assert_eq!(derive_rank(&dice), Rank::C);
    }

    #[test]
    fn test_rank_s_needs_all_six_at_d20() {
        let mut dice = [DieSize::D20; 6];
        assert_eq!(derive_rank(&dice), Rank::S);
        dice[5] = DieSize::D12;
        assert_eq!(derive_rank(&dice), Rank::A);
    }

    #[test]
    fn test_rank_is_monotonic_in_dice() {
        let mut dice = [DieSize::D4; 6];
        let mut previous = derive_rank(&dice);
        for step in 1..=5 {
            for slot in 0..6 {
                dice[slot] = DieSize::from_index(step);
                let current = derive_rank(&dice);
                assert!(current >= previous);
                assert_eq!(derive_rank(&dice), current);
                previous = current;
            }
        }
        assert_eq!(previous, Rank::S);
    }

    #[test]
    fn test_rank_codes() {
        assert_eq!(Rank::E.code(), "e");
        assert_eq!("s".parse::<Rank>().unwrap(), Rank::S);
        assert_eq!(serde_json::to_string(&Rank::B).unwrap(), "\"b\"");
    }
}
