//! Roll context.
//!
//! The situational inputs a roll sequence captures when it starts: the
//! global roll mode and the live bonus count for the stat being rolled.

use serde::{Deserialize, Serialize};

/// How crits are handled.
///
/// In `Auto` mode a maximum face evolves the die (or re-rolls at the
/// ceiling) and the sequence continues. In `Manual` mode every sequence
/// stops after one draw, and base levels are adjusted by hand instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RollMode {
    #[default]
    Auto,
    Manual,
}

impl RollMode {
    pub fn is_manual(self) -> bool {
        self == RollMode::Manual
    }
}

/// Inputs fixed for the lifetime of one roll sequence.
///
/// # Examples
///
/// ```rust
/// use diesheet::{RollContext, RollMode};
///
/// let context = RollContext::new(RollMode::Auto, 1);
/// assert_eq!(context.bonus_count, 1);
/// assert!(!context.mode.is_manual());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RollContext {
    /// Crit handling for this sequence.
    pub mode: RollMode,
    /// Bonus steps applied to the stat, read once at the start.
    pub bonus_count: u8,
}

impl RollContext {
    pub fn new(mode: RollMode, bonus_count: u8) -> Self {
        Self { mode, bonus_count }
    }
}
