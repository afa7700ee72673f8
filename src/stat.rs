//! Stat identifier module.
//!
//! Provides the `Stat` enum, the fixed set of six named attributes a
//! character sheet tracks. Each stat is backed by a growable die; see
//! [`crate::die`] for the ladder and [`crate::model`] for growth state.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// One of the six named character attributes.
///
/// Stats have immutable identity. Their textual form (used in persisted
/// documents and in bonus selections) is the variant name.
///
/// # Examples
///
/// ```rust
/// use diesheet::Stat;
///
/// let stat: Stat = "Overdrive".parse().unwrap();
/// assert_eq!(stat, Stat::Overdrive);
/// assert_eq!(stat.to_string(), "Overdrive");
/// assert_eq!(stat.index(), 2);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    AsRefStr,
)]
pub enum Stat {
    Focus,
    Instinct,
    Overdrive,
    Resonance,
    Style,
    Willpower,
}

impl Stat {
    /// All stats in sheet order.
    pub const ALL: [Stat; 6] = [
        Stat::Focus,
        Stat::Instinct,
        Stat::Overdrive,
        Stat::Resonance,
        Stat::Style,
        Stat::Willpower,
    ];

    /// Position of this stat in sheet order (0-based).
    ///
    /// Used to index the fixed-size per-stat records in
    /// [`StatModel`](crate::model::StatModel).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get the string representation of this stat.
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}
